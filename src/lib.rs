pub mod app;
pub mod cli;
pub mod configuration;
pub mod ingest;
pub mod logging;
pub mod report;
pub mod source;
pub mod stats;
pub mod types;
