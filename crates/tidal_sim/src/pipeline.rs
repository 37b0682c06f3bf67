use bevy::prelude::*;

use super::binary_system::BinaryState;
use super::control::ControlState;
use super::gesture::GestureLink;

/// Openness change per second from the arrow keys
const MANUAL_OPENNESS_RATE: f32 = 0.5;

/// Bevy plugin for the per-frame simulation.
/// Expects `BinaryState` and `ControlState` to be inserted by the app.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GestureLink>().add_systems(
            Update,
            (pump_gesture_link, manual_openness, advance_binary_system).chain(),
        );
    }
}

/// Fold every sensor update that arrived since last frame into the control state
pub fn pump_gesture_link(
    state: Res<BinaryState>,
    mut link: ResMut<GestureLink>,
    mut control: ResMut<ControlState>,
) {
    let weight = state.config.smoothing_weight;
    while let Some(update) = link.try_next() {
        control.apply(&update, weight);
    }
}

/// Arrow keys drive openness while no sensor is connected
pub fn manual_openness(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    link: Res<GestureLink>,
    mut control: ResMut<ControlState>,
) {
    if link.is_active() {
        return;
    }
    let step = MANUAL_OPENNESS_RATE * time.delta_secs();
    if keyboard.pressed(KeyCode::ArrowUp) {
        control.nudge(step);
    }
    if keyboard.pressed(KeyCode::ArrowDown) {
        control.nudge(-step);
    }
}

/// Main simulation tick: one deformation pass per rendered frame
pub fn advance_binary_system(
    time: Res<Time>,
    control: Res<ControlState>,
    mut state: ResMut<BinaryState>,
) {
    state.tick(time.delta_secs_f64(), control.openness);
}
