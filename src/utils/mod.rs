//! Configuration and logging helpers

pub mod config;
pub mod logging;

pub use config::{Config, LoggingConfig, PathsConfig, TrainingConfig, DEFAULT_CONFIG_FILE};
pub use logging::setup_logging;
