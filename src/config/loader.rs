//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (SERVICE_ACCESS__*)
//! 2. Configuration file (TOML)
//! 3. Default values

use crate::config::types::{AccessPolicyDefinition, AppConfig};
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "service-access.toml",
    ".service-access.toml",
    "~/.config/service-access/config.toml",
    "/etc/service-access/config.toml",
];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // e.g., SERVICE_ACCESS__POLICY__SSO_ENABLED=false
    builder = builder.add_source(
        Environment::with_prefix("SERVICE_ACCESS")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    validate_policy(&config.policy)?;

    if config.logging.level.trim().is_empty() {
        return Err(ConfigError::Missing {
            field: "logging.level".to_string(),
        });
    }

    Ok(())
}

/// Validate a policy definition
///
/// Rule values are not checked as patterns: a value that does not compile
/// switches its attribute to exact matching.
pub fn validate_policy(policy: &AccessPolicyDefinition) -> Result<(), ConfigError> {
    for (field, rules) in [
        ("policy.required_attributes", &policy.required_attributes),
        ("policy.rejected_attributes", &policy.rejected_attributes),
    ] {
        if rules.keys().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                message: format!("{} contains an empty attribute name", field),
            });
        }
    }

    if let Some(url) = &policy.unauthorized_redirect_url
        && url.scheme() != "http"
        && url.scheme() != "https"
    {
        return Err(ConfigError::Invalid {
            message: format!(
                "policy.unauthorized_redirect_url must use http:// or https://, got: {}",
                url
            ),
        });
    }

    Ok(())
}
