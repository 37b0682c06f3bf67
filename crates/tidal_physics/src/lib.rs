pub mod deformation;
pub mod particle;

pub use deformation::{DeformationEngine, FrameMode, FrameOutput, FrameScalars};
