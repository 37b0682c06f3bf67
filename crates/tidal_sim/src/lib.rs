pub mod binary_system;
pub mod control;
pub mod gesture;
pub mod pipeline;
