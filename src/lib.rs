//! Service access strategy
//!
//! Access-control decisions for services registered with a single sign-on
//! server.
//!
//! ## Features
//!
//! - **Service flags** - a service may be disabled outright, or excluded from single sign-on
//! - **Required attributes** - grant access when the principal carries matching values
//! - **Rejected attributes** - refuse access when the principal carries matching values
//! - **Regex or exact values** - rule values are patterns unless one fails to compile
//! - **Atomic reconfiguration** via [`SharedPolicy`]
//!
//! ## Evaluation Order
//!
//! ```text
//! no rules → allowed
//! attribute counts → rejected attributes → required attributes
//! ```
//!
//! ## Example Configuration
//!
//! ```toml
//! [policy]
//! enabled = true
//! sso_enabled = true
//! require_all_attributes = true   # every configured name must be present
//! case_insensitive = false
//! unauthorized_redirect_url = "https://sso.example.org/denied"
//!
//! [policy.required_attributes]
//! memberof = ["^staff$", "^faculty$"]
//!
//! [policy.rejected_attributes]
//! status = ["suspended"]
//! ```

pub mod access_strategy;
pub mod config;
pub mod error;
pub mod input;

// Re-export main types
pub use access_strategy::{
    AccessPolicy, AccessPolicyBuilder, AccessStrategy, AttributeValue, PrincipalAttributes,
    SharedPolicy,
};
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result};
