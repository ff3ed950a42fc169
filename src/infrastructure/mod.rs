// Infrastructure layer - Worker execution context, config, export adapters
pub mod config;
pub mod csv_export;
pub mod worker;
