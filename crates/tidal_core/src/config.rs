use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use super::error::TidalError;
use super::types::Stage;

/// Update rates the synthetic sweep may run at (Hz)
pub const SWEEP_RATE_RANGE: RangeInclusive<f32> = 0.1..=60.0;

/// Where hand-openness updates come from once the link is connected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GestureSource {
    /// Newline-delimited JSON messages on stdin
    Stdin,
    /// Synthetic hand that slowly opens and closes
    Sweep { hz: f32 },
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Particles shared by both stars (even/odd split)
    pub star_particle_count: usize,
    /// Particles in the distant background field
    pub field_particle_count: usize,
    /// Random seed; None draws one from the OS
    pub seed: Option<u64>,
    /// Core color (sRGB)
    pub inside_color: [f32; 3],
    /// Limb color (sRGB)
    pub outside_color: [f32; 3],
    /// Openness before any gesture update arrives
    pub initial_openness: f32,
    /// Weight of an incoming gesture sample in the smoothing filter
    pub smoothing_weight: f32,
    /// Exponential approach rate of the auto-framing camera (1/s)
    pub camera_follow_rate: f32,
    /// Stage shown at startup
    pub initial_stage: Stage,
    pub gesture_source: GestureSource,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            star_particle_count: 12_000,
            field_particle_count: 1_000,
            seed: None,
            // VFTS 352 is a pair of O-type stars: blue-white core, deep sky blue limb
            inside_color: [165.0 / 255.0, 243.0 / 255.0, 252.0 / 255.0],
            outside_color: [2.0 / 255.0, 132.0 / 255.0, 199.0 / 255.0],
            initial_openness: 0.5,
            smoothing_weight: 0.3,
            camera_follow_rate: 2.0,
            initial_stage: Stage::Separated,
            gesture_source: GestureSource::Sweep { hz: 2.0 },
        }
    }
}

impl SimConfig {
    /// Load a JSON config file; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, TidalError> {
        let text = fs::read_to_string(path).map_err(|source| TidalError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&text).map_err(|source| TidalError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot be built from
    pub fn validate(&self) -> Result<(), TidalError> {
        if self.star_particle_count == 0 || self.field_particle_count == 0 {
            return Err(TidalError::EmptyParticleSet);
        }
        if let GestureSource::Sweep { hz } = self.gesture_source {
            // Also rejects NaN
            if !SWEEP_RATE_RANGE.contains(&hz) {
                return Err(TidalError::InvalidSweepRate(hz));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{ "seed": 7, "initial_stage": "Contact" }"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.initial_stage, Stage::Contact);
        assert_eq!(config.star_particle_count, 12_000);
        assert_eq!(config.gesture_source, GestureSource::Sweep { hz: 2.0 });
    }

    #[test]
    fn test_gesture_source_tagging() {
        let config: SimConfig =
            serde_json::from_str(r#"{ "gesture_source": { "kind": "stdin" } }"#).unwrap();
        assert_eq!(config.gesture_source, GestureSource::Stdin);
    }

    #[test]
    fn test_zero_particles_rejected() {
        let config = SimConfig {
            star_particle_count: 0,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(TidalError::EmptyParticleSet)));
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_sweep_rate_bounded() {
        for hz in [0.0, 1e9, f32::INFINITY, f32::NAN] {
            let config = SimConfig {
                gesture_source: GestureSource::Sweep { hz },
                ..SimConfig::default()
            };
            assert!(matches!(config.validate(), Err(TidalError::InvalidSweepRate(_))));
        }
        for hz in [0.1, 2.0, 60.0] {
            let config = SimConfig {
                gesture_source: GestureSource::Sweep { hz },
                ..SimConfig::default()
            };
            assert!(config.validate().is_ok());
        }

        let flood: SimConfig =
            serde_json::from_str(r#"{ "gesture_source": { "kind": "sweep", "hz": 1e9 } }"#).unwrap();
        assert!(flood.validate().is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = SimConfig::load(Path::new("/nonexistent/tidal.json")).unwrap_err();
        assert!(matches!(err, TidalError::ConfigRead { .. }));
        assert!(err.to_string().contains("tidal.json"));
    }
}
