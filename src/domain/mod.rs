// Domain layer - Core data models and the point buffer
pub mod buffer;
pub mod chart;
pub mod telemetry;
