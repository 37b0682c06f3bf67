use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tidal_core::{SimConfig, Stage, TidalError};
use tidal_physics::particle;
use tidal_physics::DeformationEngine;

/// The binary system being shown, tracked as a Bevy Resource
#[derive(Resource)]
pub struct BinaryState {
    /// Base particles and the per-frame position buffer
    pub engine: DeformationEngine,
    /// Active stage; set directly by the user, no transition
    pub stage: Stage,
    /// Simulation clock in seconds (stops while paused).
    /// Accumulated in f64 so long sessions keep sub-frame precision.
    pub elapsed: f64,
    pub paused: bool,
    /// Frames computed so far
    pub frame: u64,
    pub config: SimConfig,
}

impl BinaryState {
    pub fn new(config: SimConfig) -> Result<Self, TidalError> {
        config.validate()?;
        let mut rng = seeded_rng(config.seed);
        let particles = particle::generate_star_particles(
            config.star_particle_count,
            config.inside_color,
            config.outside_color,
            &mut rng,
        )?;
        let engine = DeformationEngine::new(particles)?;
        info!("Generated {} star particles", engine.len());

        Ok(Self {
            engine,
            stage: config.initial_stage,
            elapsed: 0.0,
            paused: false,
            frame: 0,
            config,
        })
    }

    /// Switch stage instantly. Returns false if it was already active.
    pub fn set_stage(&mut self, stage: Stage) -> bool {
        if self.stage == stage {
            return false;
        }
        info!("Stage: {} -> {}", self.stage, stage);
        self.stage = stage;
        true
    }

    /// Advance the clock and recompute every particle
    pub fn tick(&mut self, dt: f64, openness: f32) {
        if !self.paused {
            self.elapsed += dt;
        }
        self.engine.compute_frame(self.stage, openness, self.elapsed as f32);
        self.frame += 1;
    }
}

/// Deterministic RNG when a seed is given, OS entropy otherwise
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimConfig {
        SimConfig {
            star_particle_count: 200,
            seed: Some(11),
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_same_seed_same_particles() {
        let a = BinaryState::new(small_config()).unwrap();
        let b = BinaryState::new(small_config()).unwrap();
        assert_eq!(a.engine.particles(), b.engine.particles());
    }

    #[test]
    fn test_zero_particles_rejected() {
        let config = SimConfig {
            star_particle_count: 0,
            ..small_config()
        };
        assert!(matches!(BinaryState::new(config), Err(TidalError::EmptyParticleSet)));
    }

    #[test]
    fn test_pause_freezes_clock_but_not_stage() {
        let mut state = BinaryState::new(small_config()).unwrap();
        state.tick(0.5, 0.5);
        state.paused = true;
        state.tick(0.5, 0.5);
        assert_eq!(state.elapsed, 0.5);
        assert_eq!(state.frame, 2);

        let before = state.engine.positions().to_vec();
        assert!(state.set_stage(Stage::BlackHole));
        assert!(!state.set_stage(Stage::BlackHole));
        state.tick(0.5, 0.5);
        assert_ne!(state.engine.positions(), before.as_slice());
        assert_eq!(state.engine.system_angle(), 0.5 * 2.0);
    }

    #[test]
    fn test_clock_keeps_frame_steps_after_hours() {
        let mut state = BinaryState::new(small_config()).unwrap();
        let dt = 1.0 / 60.0;
        state.elapsed = 6.0 * 3600.0;
        let start = state.elapsed;
        for _ in 0..600 {
            state.tick(dt, 0.5);
        }
        // An f32 clock at 6 h rounds each 16.7 ms step to a multiple of ~2 ms
        assert!((state.elapsed - start - 10.0).abs() < 1e-6);
    }
}
