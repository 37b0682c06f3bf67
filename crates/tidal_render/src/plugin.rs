use bevy::prelude::*;
use tidal_sim::pipeline::advance_binary_system;

use super::camera;
use super::field;
use super::particles;
use super::ui;

/// Windowed presentation of the binary system.
/// Needs `SimulationPlugin` for the per-frame tick it orders against.
pub struct TidalRenderPlugin;

impl Plugin for TidalRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ui::HudThrottle>()
            .add_systems(
                Startup,
                (
                    camera::spawn_camera,
                    ui::spawn_hud,
                    particles::spawn_particle_visuals,
                    field::spawn_field,
                ),
            )
            .add_systems(
                Update,
                (ui::keyboard_controls, ui::stage_button_system).before(advance_binary_system),
            )
            .add_systems(
                Update,
                (
                    particles::update_particle_visuals,
                    field::spin_field,
                    camera::auto_frame_camera,
                    ui::highlight_stage_buttons,
                )
                    .after(advance_binary_system),
            )
            .add_systems(Update, (ui::update_hud, ui::toggle_fullscreen));
    }
}
