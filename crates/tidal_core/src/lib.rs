pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::{GestureSource, SimConfig};
pub use constants::*;
pub use error::TidalError;
pub use types::*;
