use bevy::prelude::*;
use std::collections::HashMap;
use tidal_sim::binary_system::BinaryState;

/// Parent of every star particle; carries the whole-system spin
#[derive(Component)]
pub struct StarSystemRoot;

/// Marker for particle point entities in the render world
#[derive(Component)]
pub struct ParticlePoint {
    pub index: usize,
}

/// Render radius of one particle
const POINT_RADIUS: f32 = 0.035;
/// Color steps per channel when sharing materials
const COLOR_LEVELS: f32 = 15.0;

/// Spawn one entity per star particle under a single rotating root.
/// Materials are shared per quantized color so the batcher sees few of them.
pub fn spawn_particle_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    state: Res<BinaryState>,
) {
    let mesh = match Sphere::new(POINT_RADIUS).mesh().ico(0) {
        Ok(mesh) => meshes.add(mesh),
        Err(e) => {
            error!("Failed to build particle mesh: {e}");
            return;
        }
    };

    let mut material_cache: HashMap<[u8; 3], Handle<StandardMaterial>> = HashMap::new();
    let positions = state.engine.positions();
    let colors = state.engine.colors();

    commands
        .spawn((Transform::default(), Visibility::default(), StarSystemRoot))
        .with_children(|parent| {
            for (index, (pos, rgb)) in positions.iter().zip(colors).enumerate() {
                let mat = material_cache
                    .entry(color_key(*rgb))
                    .or_insert_with_key(|key| {
                        let color = key_color(*key);
                        materials.add(StandardMaterial {
                            base_color: color.with_alpha(0.9),
                            emissive: LinearRgba::from(color) * 2.0,
                            alpha_mode: AlphaMode::Add,
                            unlit: true,
                            ..default()
                        })
                    })
                    .clone();

                parent.spawn((
                    Mesh3d(mesh.clone()),
                    MeshMaterial3d(mat),
                    Transform::from_translation(Vec3::from_array(*pos)),
                    ParticlePoint { index },
                ));
            }
        });

    info!(
        "Spawned {} particle visuals with {} shared materials",
        positions.len(),
        material_cache.len()
    );
}

/// Copy this frame's positions onto the entities and spin the root
pub fn update_particle_visuals(
    state: Res<BinaryState>,
    mut roots: Query<&mut Transform, With<StarSystemRoot>>,
    mut points: Query<(&mut Transform, &ParticlePoint), Without<StarSystemRoot>>,
) {
    let positions = state.engine.positions();

    for (mut transform, point) in points.iter_mut() {
        let Some(pos) = positions.get(point.index) else {
            continue;
        };
        transform.translation = Vec3::from_array(*pos);
    }

    let spin = Quat::from_rotation_y(state.engine.system_angle());
    for mut transform in roots.iter_mut() {
        transform.rotation = spin;
    }
}

fn color_key(rgb: [f32; 3]) -> [u8; 3] {
    rgb.map(|c| (c.clamp(0.0, 1.0) * COLOR_LEVELS).round() as u8)
}

fn key_color(key: [u8; 3]) -> Color {
    let [r, g, b] = key.map(|k| k as f32 / COLOR_LEVELS);
    Color::srgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidal_core::{SimConfig, Stage};
    use tidal_physics::deformation::rotate_about_y;

    #[test]
    fn test_color_quantization() {
        assert_eq!(color_key([0.0, 0.5, 1.0]), [0, 8, 15]);
        assert_eq!(color_key([1.2, -0.1, 0.52]), [15, 0, 8]);
    }

    #[test]
    fn test_root_spin_matches_engine_rotation() {
        let config = SimConfig {
            star_particle_count: 16,
            seed: Some(5),
            ..SimConfig::default()
        };
        let mut state = BinaryState::new(config).unwrap();
        state.stage = Stage::Contact;
        state.tick(1.7, 0.4);
        let expected: Vec<_> = state
            .engine
            .positions()
            .iter()
            .map(|p| rotate_about_y(*p, state.engine.system_angle()))
            .collect();

        let mut app = App::new();
        app.insert_resource(state)
            .add_systems(Update, update_particle_visuals);
        let root = app
            .world_mut()
            .spawn((Transform::default(), StarSystemRoot))
            .id();
        let points: Vec<Entity> = (0..16)
            .map(|index| app.world_mut().spawn((Transform::default(), ParticlePoint { index })).id())
            .collect();
        app.update();

        let spin = app.world().get::<Transform>(root).unwrap().rotation;
        for (entity, world) in points.iter().zip(&expected) {
            let local = app.world().get::<Transform>(*entity).unwrap().translation;
            let rotated = spin * local;
            assert!(rotated.distance(Vec3::from_array(*world)) < 1e-4);
        }
    }
}
