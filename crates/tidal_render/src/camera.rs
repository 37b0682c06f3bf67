use bevy::prelude::*;
use tidal_core::{Stage, CAMERA_ORBIT_VIEW, CAMERA_TOP_VIEW};
use tidal_sim::binary_system::BinaryState;

/// Camera that frames the system according to the active stage
#[derive(Component)]
pub struct AutoFramer {
    /// Exponential approach rate (1/s)
    pub rate: f32,
}

/// Where the camera should sit for a stage
pub fn camera_target(stage: Stage) -> Vec3 {
    match stage {
        Stage::BlackHole => Vec3::from_array(CAMERA_TOP_VIEW),
        Stage::Separated | Stage::Contact | Stage::Merged => Vec3::from_array(CAMERA_ORBIT_VIEW),
    }
}

/// Fraction of the remaining distance covered this frame; capped at 1 so a
/// long hitch lands on the target instead of overshooting it
pub fn framing_factor(rate: f32, dt: f32) -> f32 {
    (rate * dt).clamp(0.0, 1.0)
}

pub fn approach(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    current.lerp(target, framing_factor(rate, dt))
}

/// Spawn the main camera already framed for the starting stage
pub fn spawn_camera(mut commands: Commands, state: Res<BinaryState>) {
    let pos = camera_target(state.stage);

    info!("Camera spawned at ({:.1}, {:.1}, {:.1})", pos.x, pos.y, pos.z);

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 60f32.to_radians(),
            ..default()
        }),
        Transform::from_translation(pos).looking_at(Vec3::ZERO, Vec3::Y),
        AutoFramer {
            rate: state.config.camera_follow_rate,
        },
    ));

    // Everything is emissive; a little ambient keeps depth cues
    commands.insert_resource(AmbientLight {
        color: Color::srgb_u8(0x4f, 0xc3, 0xf7),
        brightness: 40.0,
    });
}

/// Ease the camera toward the stage target, frame-rate independent
pub fn auto_frame_camera(
    time: Res<Time>,
    state: Res<BinaryState>,
    mut query: Query<(&mut Transform, &AutoFramer)>,
) {
    let target = camera_target(state.stage);
    let dt = time.delta_secs();

    for (mut transform, framer) in query.iter_mut() {
        transform.translation = approach(transform.translation, target, framer.rate, dt);
        transform.look_at(Vec3::ZERO, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tidal_core::SimConfig;

    #[test]
    fn test_targets() {
        assert_eq!(camera_target(Stage::BlackHole), Vec3::new(0.0, 10.0, 0.1));
        for stage in [Stage::Separated, Stage::Contact, Stage::Merged] {
            assert_eq!(camera_target(stage), Vec3::new(0.0, 2.0, 8.0));
        }
    }

    #[test]
    fn test_factor_never_overshoots() {
        assert_eq!(framing_factor(2.0, 1.0 / 60.0), 2.0 / 60.0);
        assert_eq!(framing_factor(2.0, 3.0), 1.0);
        let target = Vec3::new(0.0, 10.0, 0.1);
        assert_eq!(approach(Vec3::new(0.0, 2.0, 8.0), target, 2.0, 5.0), target);
    }

    #[test]
    fn test_framing_time_independent_of_frame_rate() {
        let start = camera_target(Stage::Separated);
        let target = camera_target(Stage::BlackHole);
        let total = start.distance(target);

        for fps in [30.0f32, 60.0, 144.0] {
            let dt = 1.0 / fps;
            let mut pos = start;
            let mut frames = 0;
            while pos.distance(target) > total * 0.1 {
                pos = approach(pos, target, 2.0, dt);
                frames += 1;
            }
            let seconds = frames as f32 * dt;
            assert!((1.0..2.0).contains(&seconds), "{fps} fps took {seconds}s");
        }
    }

    #[test]
    fn test_system_moves_camera_and_looks_at_origin() {
        let config = SimConfig {
            star_particle_count: 8,
            seed: Some(1),
            ..SimConfig::default()
        };
        let mut state = BinaryState::new(config).unwrap();
        state.stage = Stage::BlackHole;

        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_millis(250));

        let mut app = App::new();
        app.insert_resource(time)
            .insert_resource(state)
            .add_systems(Update, auto_frame_camera);
        let camera = app
            .world_mut()
            .spawn((
                Transform::from_translation(camera_target(Stage::Separated)),
                AutoFramer { rate: 2.0 },
            ))
            .id();
        app.update();

        let transform = app.world().get::<Transform>(camera).unwrap();
        let expected = camera_target(Stage::Separated).lerp(camera_target(Stage::BlackHole), 0.5);
        assert!(transform.translation.distance(expected) < 1e-4);
        let facing = transform.forward().dot(-transform.translation.normalize());
        assert!(facing > 0.999);
    }
}
