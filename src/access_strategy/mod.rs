//! Service access strategy
//!
//! Decides, for one registered service, whether it may be used at all,
//! whether it may take part in single sign-on, and whether a principal's
//! attributes allow access to it.
//!
//! ## Attribute rules
//!
//! A policy carries two independent rule sets keyed by attribute name:
//!
//! - `rejected_attributes`: a match refuses access outright
//! - `required_attributes`: a match grants access
//!
//! Rejection is always checked first. Rule values are regular expressions
//! matched anywhere inside the principal's values, unless one of them is not
//! a valid pattern, in which case the values of that attribute are compared
//! exactly.
//!
//! ## Example
//!
//! ```
//! use service_access::access_strategy::{AccessPolicy, AccessStrategy, PrincipalAttributes};
//!
//! let policy = AccessPolicy::builder()
//!     .required_attribute("memberof", ["^staff$", "^faculty$"])
//!     .rejected_attribute("status", ["suspended"])
//!     .build();
//!
//! let attributes = PrincipalAttributes::from([
//!     ("memberof".to_string(), vec!["staff", "alumni"].into()),
//!     ("status".to_string(), "active".into()),
//! ]);
//!
//! assert!(policy.do_principal_attributes_allow_service_access("casuser", &attributes));
//! ```

pub mod evaluator;
pub mod matcher;
pub mod policy;
pub mod shared;
pub mod types;

pub use evaluator::AccessStrategy;
pub use matcher::AttributeMatcher;
pub use policy::{AccessPolicy, AccessPolicyBuilder};
pub use shared::SharedPolicy;
pub use types::{AttributeRules, AttributeValue, PrincipalAttributes};
