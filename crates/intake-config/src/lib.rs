//! intake-config
//!
//! Persistent user preferences for the intake shell.
//! Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{default_base_dir, ConfigManager, HOME_ENV_VAR};
pub use model::Config;
