// Client-side telemetry decimation and level-of-detail pipeline
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
