// Application layer - Use cases for the decimation/LOD pipeline
pub mod aggregate;
pub mod backend;
pub mod chart_service;
pub mod decimator;
pub mod ingest;
pub mod merge;
pub mod precision;
