//! Configuration loading

pub mod settings;

pub use settings::{ApiConfig, LoggingConfig, OutputConfig, Settings};
