//! Configuration module
//!
//! Loads a service access policy definition, plus logging settings, from TOML
//! files and environment variables.

pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_from_str, validate_policy};
pub use types::*;
