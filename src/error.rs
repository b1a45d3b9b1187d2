//! Error types for service-access
//!
//! Access decisions never fail: the evaluator always answers with a plain
//! boolean. The errors here cover the surrounding plumbing, namely loading a
//! policy definition and reading principal attributes supplied by an operator.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Attribute input error: {0}")]
    Attribute(#[from] AttributeError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },
}

/// Errors raised while reading principal attributes from operator input
#[derive(Error, Debug)]
pub enum AttributeError {
    #[error("Malformed attribute '{0}', expected key=value")]
    Malformed(String),

    #[error("Attribute name must not be empty in '{0}'")]
    EmptyName(String),

    #[error("Invalid attribute document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;
