use std::path::PathBuf;
use thiserror::Error;

/// Setup-time failures. The per-frame path has no errors.
#[derive(Debug, Error)]
pub enum TidalError {
    #[error("particle set must contain at least one particle")]
    EmptyParticleSet,

    #[error("unknown stage `{0}` (expected separated, contact, merged or black-hole)")]
    UnknownStage(String),

    #[error("gesture sweep rate {0} Hz is outside 0.1..=60")]
    InvalidSweepRate(f32),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
