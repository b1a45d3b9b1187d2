//! Service access policy
//!
//! An [`AccessPolicy`] is built once from its definition and never changes.
//! Attribute matchers are compiled at build time so evaluation does not touch
//! the regex compiler. Reconfiguring a service means building a new policy
//! (see [`AccessPolicy::to_builder`]) and swapping it in.

use crate::access_strategy::matcher::AttributeMatcher;
use crate::access_strategy::types::AttributeRules;
use crate::config::AccessPolicyDefinition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Access strategy of one registered service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "AccessPolicyDefinition", into = "AccessPolicyDefinition")]
pub struct AccessPolicy {
    definition: AccessPolicyDefinition,
    /// Compiled matchers for `required_attributes`, same keys
    pub(crate) required: BTreeMap<String, AttributeMatcher>,
    /// Compiled matchers for `rejected_attributes`, same keys
    pub(crate) rejected: BTreeMap<String, AttributeMatcher>,
}

impl AccessPolicy {
    /// Create a policy without attribute rules
    pub fn new(enabled: bool, sso_enabled: bool) -> Self {
        Self::builder()
            .enabled(enabled)
            .sso_enabled(sso_enabled)
            .build()
    }

    /// Start building a policy from the defaults
    pub fn builder() -> AccessPolicyBuilder {
        AccessPolicyBuilder::default()
    }

    /// Start building a replacement policy from this one
    pub fn to_builder(&self) -> AccessPolicyBuilder {
        AccessPolicyBuilder {
            definition: self.definition.clone(),
        }
    }

    pub fn from_definition(definition: AccessPolicyDefinition) -> Self {
        let required = compile(&definition.required_attributes, definition.case_insensitive);
        let rejected = compile(&definition.rejected_attributes, definition.case_insensitive);

        Self {
            definition,
            required,
            rejected,
        }
    }

    pub fn definition(&self) -> &AccessPolicyDefinition {
        &self.definition
    }

    pub fn is_enabled(&self) -> bool {
        self.definition.enabled
    }

    pub fn is_sso_enabled(&self) -> bool {
        self.definition.sso_enabled
    }

    pub fn require_all_attributes(&self) -> bool {
        self.definition.require_all_attributes
    }

    /// Is attribute value matching case insensitive?
    pub fn case_insensitive(&self) -> bool {
        self.definition.case_insensitive
    }

    pub fn required_attributes(&self) -> &AttributeRules {
        &self.definition.required_attributes
    }

    pub fn rejected_attributes(&self) -> &AttributeRules {
        &self.definition.rejected_attributes
    }

    pub fn unauthorized_redirect_url(&self) -> Option<&Url> {
        self.definition.unauthorized_redirect_url.as_ref()
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::from_definition(AccessPolicyDefinition::default())
    }
}

impl PartialEq for AccessPolicy {
    fn eq(&self, other: &Self) -> bool {
        self.definition == other.definition
    }
}

impl Eq for AccessPolicy {}

impl From<AccessPolicyDefinition> for AccessPolicy {
    fn from(definition: AccessPolicyDefinition) -> Self {
        Self::from_definition(definition)
    }
}

impl From<AccessPolicy> for AccessPolicyDefinition {
    fn from(policy: AccessPolicy) -> Self {
        policy.definition
    }
}

impl fmt::Display for AccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.definition;
        write!(
            f,
            "AccessPolicy[enabled={}, sso_enabled={}, require_all_attributes={}, \
             required_attributes={:?}, unauthorized_redirect_url={}, \
             case_insensitive={}, rejected_attributes={:?}]",
            d.enabled,
            d.sso_enabled,
            d.require_all_attributes,
            d.required_attributes,
            d.unauthorized_redirect_url
                .as_ref()
                .map(Url::as_str)
                .unwrap_or("none"),
            d.case_insensitive,
            d.rejected_attributes,
        )
    }
}

fn compile(rules: &AttributeRules, case_insensitive: bool) -> BTreeMap<String, AttributeMatcher> {
    rules
        .iter()
        .map(|(name, values)| (name.clone(), AttributeMatcher::new(values, case_insensitive)))
        .collect()
}

/// Builder for [`AccessPolicy`]
#[derive(Debug, Clone, Default)]
pub struct AccessPolicyBuilder {
    definition: AccessPolicyDefinition,
}

impl AccessPolicyBuilder {
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.definition.enabled = enabled;
        self
    }

    pub fn sso_enabled(mut self, sso_enabled: bool) -> Self {
        self.definition.sso_enabled = sso_enabled;
        self
    }

    /// Require all configured attribute names to be present (`true`) or any of them (`false`)
    pub fn require_all_attributes(mut self, require_all: bool) -> Self {
        self.definition.require_all_attributes = require_all;
        self
    }

    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.definition.case_insensitive = case_insensitive;
        self
    }

    /// Add a required attribute; values are merged with any already configured for `name`
    pub fn required_attribute<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_rule(&mut self.definition.required_attributes, name, values);
        self
    }

    /// Replace all required attributes
    pub fn required_attributes(mut self, rules: AttributeRules) -> Self {
        self.definition.required_attributes = rules;
        self
    }

    /// Add a rejected attribute; values are merged with any already configured for `name`
    pub fn rejected_attribute<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_rule(&mut self.definition.rejected_attributes, name, values);
        self
    }

    /// Replace all rejected attributes
    pub fn rejected_attributes(mut self, rules: AttributeRules) -> Self {
        self.definition.rejected_attributes = rules;
        self
    }

    pub fn unauthorized_redirect_url(mut self, url: Option<Url>) -> Self {
        self.definition.unauthorized_redirect_url = url;
        self
    }

    pub fn build(self) -> AccessPolicy {
        AccessPolicy::from_definition(self.definition)
    }
}

fn extend_rule<I, S>(rules: &mut AttributeRules, name: impl Into<String>, values: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    rules
        .entry(name.into())
        .or_default()
        .extend(values.into_iter().map(Into::into));
}
