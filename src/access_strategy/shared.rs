//! Shared, replaceable access policy
//!
//! Readers take a snapshot of the current policy for the duration of one
//! decision. Reconfiguration swaps a whole new policy in, so a decision never
//! observes a partially updated rule set.

use crate::access_strategy::evaluator::AccessStrategy;
use crate::access_strategy::policy::AccessPolicy;
use crate::access_strategy::types::PrincipalAttributes;
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Handle to the current access policy of a service
#[derive(Debug)]
pub struct SharedPolicy {
    current: ArcSwap<AccessPolicy>,
}

impl SharedPolicy {
    pub fn new(policy: AccessPolicy) -> Self {
        Self {
            current: ArcSwap::from_pointee(policy),
        }
    }

    /// Current policy; stays valid even if it is replaced afterwards
    pub fn snapshot(&self) -> Arc<AccessPolicy> {
        self.current.load_full()
    }

    /// Atomically install a new policy, returning the one it replaced
    pub fn replace(&self, policy: AccessPolicy) -> Arc<AccessPolicy> {
        info!(policy = %policy, "Replacing service access policy");
        self.current.swap(Arc::new(policy))
    }

    /// Build a replacement from the current policy and install it
    pub fn update<F>(&self, f: F) -> Arc<AccessPolicy>
    where
        F: Fn(&AccessPolicy) -> AccessPolicy,
    {
        let previous = self.current.rcu(|current| Arc::new(f(current)));
        let current = self.snapshot();
        info!(policy = %current, "Updated service access policy");
        previous
    }
}

impl Default for SharedPolicy {
    fn default() -> Self {
        Self::new(AccessPolicy::default())
    }
}

impl From<AccessPolicy> for SharedPolicy {
    fn from(policy: AccessPolicy) -> Self {
        Self::new(policy)
    }
}

impl AccessStrategy for SharedPolicy {
    fn is_service_access_allowed(&self) -> bool {
        self.current.load().is_service_access_allowed()
    }

    fn is_service_access_allowed_for_sso(&self) -> bool {
        self.current.load().is_service_access_allowed_for_sso()
    }

    fn do_principal_attributes_allow_service_access(
        &self,
        principal: &str,
        attributes: &PrincipalAttributes,
    ) -> bool {
        self.current
            .load()
            .do_principal_attributes_allow_service_access(principal, attributes)
    }

    fn unauthorized_redirect_url(&self) -> Option<Url> {
        self.current.load().unauthorized_redirect_url().cloned()
    }
}
