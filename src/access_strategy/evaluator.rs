//! Access strategy evaluation
//!
//! Decides whether a principal's attributes allow access to a service:
//! 1. No attribute rules at all: access is allowed
//! 2. Not enough principal attributes to process the rules: denied
//! 3. Any rejected attribute matches: denied
//! 4. Otherwise the required attributes decide
//!
//! Presence and value matching use different quantifiers. With
//! `require_all_attributes` every configured attribute name must be present,
//! but a single present attribute whose values match is enough for a verdict.

use crate::access_strategy::matcher::AttributeMatcher;
use crate::access_strategy::policy::AccessPolicy;
use crate::access_strategy::types::PrincipalAttributes;
use std::collections::BTreeMap;
use tracing::{debug, info, trace};
use url::Url;

/// Decisions a registered service's access strategy answers for the login flow
pub trait AccessStrategy: Send + Sync {
    /// Is the service allowed to use the system at all?
    fn is_service_access_allowed(&self) -> bool;

    /// Is the service allowed to take part in single sign-on?
    fn is_service_access_allowed_for_sso(&self) -> bool;

    /// Do the principal's attributes satisfy the attribute rules of the service?
    fn do_principal_attributes_allow_service_access(
        &self,
        principal: &str,
        attributes: &PrincipalAttributes,
    ) -> bool;

    /// Where to send a principal that was refused access
    fn unauthorized_redirect_url(&self) -> Option<Url>;
}

impl AccessStrategy for AccessPolicy {
    fn is_service_access_allowed(&self) -> bool {
        if !self.is_enabled() {
            trace!("Service is not enabled in service registry");
        }
        self.is_enabled()
    }

    fn is_service_access_allowed_for_sso(&self) -> bool {
        if !self.is_sso_enabled() {
            trace!("Service is not authorized to participate in SSO");
        }
        self.is_sso_enabled()
    }

    fn do_principal_attributes_allow_service_access(
        &self,
        principal: &str,
        attributes: &PrincipalAttributes,
    ) -> bool {
        if self.required.is_empty() && self.rejected.is_empty() {
            debug!(principal, "Skipping access strategy, no attribute rules are defined");
            return true;
        }

        if !self.enough_attributes_available_to_process(principal, attributes) {
            debug!(
                principal,
                "Access is denied, not enough attributes are available to satisfy requirements"
            );
            return false;
        }

        if self.do_rejected_attributes_refuse_principal_access(attributes) {
            debug!(
                principal,
                "Access is denied, the principal carries attributes that reject service access"
            );
            return false;
        }

        if !self.do_required_attributes_allow_principal_access(attributes) {
            debug!(
                principal,
                "Access is denied, the principal does not have the required attributes"
            );
            return false;
        }

        true
    }

    fn unauthorized_redirect_url(&self) -> Option<Url> {
        AccessPolicy::unauthorized_redirect_url(self).cloned()
    }
}

impl AccessPolicy {
    /// Coarse check comparing attribute counts before any matching happens.
    ///
    /// Counts are of attribute names, not of names the rules refer to.
    pub fn enough_attributes_available_to_process(
        &self,
        principal: &str,
        attributes: &PrincipalAttributes,
    ) -> bool {
        if attributes.is_empty() && !self.required.is_empty() {
            debug!(
                principal,
                "No principal attributes are found to satisfy attribute requirements"
            );
            return false;
        }

        if attributes.len() < self.rejected.len() {
            debug!(
                principal,
                available = attributes.len(),
                rejected = self.rejected.len(),
                "Principal does not carry as many attributes as there are rejected attributes"
            );
            return false;
        }

        if attributes.len() < self.required.len() {
            debug!(
                principal,
                available = attributes.len(),
                required = self.required.len(),
                "Principal does not carry as many attributes as there are required attributes"
            );
            return false;
        }

        true
    }

    fn do_rejected_attributes_refuse_principal_access(
        &self,
        attributes: &PrincipalAttributes,
    ) -> bool {
        debug!(
            rejected = ?self.rejected_attributes(),
            principal_attributes = ?attributes,
            "Examining rejected attributes"
        );

        if self.rejected.is_empty() {
            debug!("No rejected attributes are defined");
            return false;
        }

        let present = present_rules(&self.rejected, attributes);
        if self.require_all_attributes() && present.len() < self.rejected.len() {
            debug!("Not all rejected attributes are available to the principal");
            return false;
        }

        first_matching(&present, attributes)
            .inspect(|(name, value)| {
                info!(
                    attribute = name,
                    value, "Principal is denied access since it carries a rejected attribute"
                );
            })
            .is_some()
    }

    fn do_required_attributes_allow_principal_access(
        &self,
        attributes: &PrincipalAttributes,
    ) -> bool {
        debug!(
            required = ?self.required_attributes(),
            principal_attributes = ?attributes,
            "Examining required attributes"
        );

        if self.required.is_empty() {
            debug!("No required attributes are defined");
            return true;
        }

        let present = present_rules(&self.required, attributes);
        if self.require_all_attributes() && present.len() < self.required.len() {
            debug!("Not all required attributes are available to the principal");
            return false;
        }

        first_matching(&present, attributes)
            .inspect(|(name, value)| {
                info!(
                    attribute = name,
                    value, "Principal is authorized to access the service"
                );
            })
            .is_some()
    }
}

/// Rules whose attribute name the principal carries
fn present_rules<'a>(
    rules: &'a BTreeMap<String, AttributeMatcher>,
    attributes: &PrincipalAttributes,
) -> Vec<(&'a str, &'a AttributeMatcher)> {
    rules
        .iter()
        .filter(|(name, _)| attributes.contains_key(name.as_str()))
        .map(|(name, matcher)| (name.as_str(), matcher))
        .collect()
}

/// First rule satisfied by the principal, with the value that satisfied it
fn first_matching<'a>(
    rules: &[(&'a str, &AttributeMatcher)],
    attributes: &'a PrincipalAttributes,
) -> Option<(&'a str, &'a str)> {
    rules.iter().find_map(|(name, matcher)| {
        let available = attributes.get(*name)?.value_set();
        matcher.find_match(&available).map(|value| (*name, value))
    })
}
