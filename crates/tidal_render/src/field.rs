use bevy::prelude::*;
use tidal_core::{FIELD_SPIN_X, FIELD_SPIN_Y};
use tidal_physics::particle::generate_field;
use tidal_sim::binary_system::{BinaryState, seeded_rng};

/// Parent of the distant background points
#[derive(Component)]
pub struct FieldRoot;

const FIELD_POINT_RADIUS: f32 = 0.08;

/// Orientation of the background field after `t` seconds
pub fn field_rotation(t: f32) -> Quat {
    Quat::from_euler(EulerRot::XYZ, t * FIELD_SPIN_X, t * FIELD_SPIN_Y, 0.0)
}

pub fn spawn_field(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    state: Res<BinaryState>,
) {
    // Offset the seed so the field does not mirror the star draws
    let mut rng = seeded_rng(state.config.seed.map(|s| s.wrapping_add(1)));
    let points = match generate_field(state.config.field_particle_count, &mut rng) {
        Ok(points) => points,
        Err(e) => {
            error!("Background field skipped: {e}");
            return;
        }
    };
    let mesh = match Sphere::new(FIELD_POINT_RADIUS).mesh().ico(0) {
        Ok(mesh) => meshes.add(mesh),
        Err(e) => {
            error!("Failed to build field mesh: {e}");
            return;
        }
    };

    let color = Color::srgb_u8(0x55, 0x77, 0xaa);
    let material = materials.add(StandardMaterial {
        base_color: color.with_alpha(0.6),
        emissive: LinearRgba::from(color),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    commands
        .spawn((Transform::default(), Visibility::default(), FieldRoot))
        .with_children(|parent| {
            for pos in &points {
                parent.spawn((
                    Mesh3d(mesh.clone()),
                    MeshMaterial3d(material.clone()),
                    Transform::from_translation(Vec3::from_array(*pos)),
                ));
            }
        });

    info!("Spawned {} background points", points.len());
}

/// Slow tumble, independent of stage
pub fn spin_field(state: Res<BinaryState>, mut query: Query<&mut Transform, With<FieldRoot>>) {
    let rotation = field_rotation(state.elapsed as f32);
    for mut transform in query.iter_mut() {
        transform.rotation = rotation;
    }
}
