//! Configuration types for service-access
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::access_strategy::AttributeRules;
use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Access strategy of the service being evaluated
    pub policy: AccessPolicyDefinition,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Declarative form of a service access strategy
///
/// Every field is optional in the source; missing fields take the defaults of
/// an enabled, SSO-capable service without attribute rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessPolicyDefinition {
    /// Whether the service may use the system at all
    pub enabled: bool,

    /// Whether the service may participate in single sign-on
    pub sso_enabled: bool,

    /// Require every configured attribute name to be present on the principal
    pub require_all_attributes: bool,

    /// Compare attribute values without regard to case
    pub case_insensitive: bool,

    /// Attributes that grant access when matched
    pub required_attributes: AttributeRules,

    /// Attributes that refuse access when matched
    pub rejected_attributes: AttributeRules,

    /// Where a denied principal may be sent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unauthorized_redirect_url: Option<Url>,
}

impl Default for AccessPolicyDefinition {
    fn default() -> Self {
        Self {
            enabled: true,
            sso_enabled: true,
            require_all_attributes: true,
            case_insensitive: false,
            required_attributes: AttributeRules::new(),
            rejected_attributes: AttributeRules::new(),
            unauthorized_redirect_url: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.policy.enabled);
        assert!(config.policy.sso_enabled);
        assert!(config.policy.require_all_attributes);
        assert!(!config.policy.case_insensitive);
        assert!(config.policy.required_attributes.is_empty());
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_deserialize_partial_definition() {
        let json = r#"{
            "sso_enabled": false,
            "required_attributes": {"memberof": ["staff", "faculty"]}
        }"#;
        let definition: AccessPolicyDefinition = serde_json::from_str(json).unwrap();

        assert!(definition.enabled);
        assert!(!definition.sso_enabled);
        assert_eq!(definition.required_attributes["memberof"].len(), 2);
        assert!(definition.rejected_attributes.is_empty());
    }

    #[test]
    fn test_deserialize_redirect_url() {
        let json = r#"{"unauthorized_redirect_url": "https://sso.example.org/denied"}"#;
        let definition: AccessPolicyDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(
            definition.unauthorized_redirect_url.unwrap().as_str(),
            "https://sso.example.org/denied"
        );

        let invalid = r#"{"unauthorized_redirect_url": "not a url"}"#;
        assert!(serde_json::from_str::<AccessPolicyDefinition>(invalid).is_err());
    }

    #[test]
    fn test_deserialize_log_format() {
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);
    }
}
