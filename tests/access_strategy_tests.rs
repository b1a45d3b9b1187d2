//! Access strategy integration tests
//!
//! Covers:
//! - Policies without attribute rules
//! - Rejected attributes taking precedence over required attributes
//! - ALL vs ANY presence of configured attribute names
//! - Regex and exact value matching, with and without case folding
//! - The attribute count precheck
//!
//! NOTE: presence and value matching use different quantifiers. Under
//! `require_all_attributes` every required name must be present, but one
//! matching attribute is enough to grant access.

use rstest::rstest;
use service_access::access_strategy::{
    AccessPolicy, AccessStrategy, AttributeValue, PrincipalAttributes, SharedPolicy,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn attrs(pairs: &[(&str, &str)]) -> PrincipalAttributes {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), AttributeValue::from(*v)))
        .collect()
}

fn allows(policy: &AccessPolicy, attributes: &PrincipalAttributes) -> bool {
    policy.do_principal_attributes_allow_service_access("casuser", attributes)
}

// =============================================================================
// 1. Policies without attribute rules
// =============================================================================

mod no_rules {
    use super::*;

    #[rstest]
    #[case(attrs(&[]))]
    #[case(attrs(&[("role", "guest")]))]
    #[case(attrs(&[("status", "suspended"), ("uid", "casuser")]))]
    fn test_always_allowed(#[case] attributes: PrincipalAttributes) {
        assert!(allows(&AccessPolicy::default(), &attributes));
        assert!(allows(&AccessPolicy::new(false, false), &attributes));
    }

    #[rstest]
    #[case(true, true)]
    #[case(true, false)]
    #[case(false, true)]
    #[case(false, false)]
    fn test_flags_mirror_configuration(#[case] enabled: bool, #[case] sso_enabled: bool) {
        let policy = AccessPolicy::new(enabled, sso_enabled);
        assert_eq!(policy.is_service_access_allowed(), enabled);
        assert_eq!(policy.is_service_access_allowed_for_sso(), sso_enabled);
    }

    #[test]
    fn test_flags_do_not_affect_attribute_decision() {
        let policy = AccessPolicy::builder()
            .enabled(false)
            .required_attribute("role", ["admin"])
            .build();
        assert!(!policy.is_service_access_allowed());
        assert!(allows(&policy, &attrs(&[("role", "admin")])));
    }
}

// =============================================================================
// 2. Required attributes
// =============================================================================

mod required_attributes {
    use super::*;

    fn admin_policy() -> AccessPolicy {
        AccessPolicy::builder()
            .require_all_attributes(true)
            .required_attribute("role", ["admin"])
            .build()
    }

    #[test]
    fn test_matching_role_with_extra_attributes() {
        assert!(allows(
            &admin_policy(),
            &attrs(&[("role", "admin"), ("dept", "it")])
        ));
    }

    #[test]
    fn test_missing_required_name() {
        // one attribute against one rule passes the count check,
        // then the presence check fails
        assert!(!allows(&admin_policy(), &attrs(&[("dept", "it")])));
    }

    #[test]
    fn test_empty_principal() {
        assert!(!allows(&admin_policy(), &attrs(&[])));
    }

    #[test]
    fn test_require_all_with_one_name_absent() {
        let policy = AccessPolicy::builder()
            .required_attribute("role", ["admin"])
            .required_attribute("dept", ["it"])
            .build();
        assert!(!allows(
            &policy,
            &attrs(&[("role", "admin"), ("uid", "casuser")])
        ));
    }

    #[test]
    fn test_require_all_any_value_semantics() {
        let policy = AccessPolicy::builder()
            .required_attribute("role", ["admin"])
            .required_attribute("dept", ["finance"])
            .build();

        // both names present, only one matches
        assert!(allows(&policy, &attrs(&[("role", "admin"), ("dept", "it")])));
        assert!(allows(&policy, &attrs(&[("role", "guest"), ("dept", "finance")])));
        assert!(!allows(&policy, &attrs(&[("role", "guest"), ("dept", "it")])));
    }

    #[test]
    fn test_any_presence() {
        let policy = AccessPolicy::builder()
            .require_all_attributes(false)
            .required_attribute("role", ["admin"])
            .required_attribute("dept", ["finance"])
            .build();

        assert!(allows(&policy, &attrs(&[("role", "admin"), ("uid", "casuser")])));
        assert!(!allows(&policy, &attrs(&[("role", "guest"), ("uid", "casuser")])));
    }

    #[test]
    fn test_multi_valued_principal_attribute() {
        let policy = AccessPolicy::builder()
            .required_attribute("memberof", ["^faculty$"])
            .build();

        let mut attributes = PrincipalAttributes::new();
        attributes.insert(
            "memberof".to_string(),
            AttributeValue::from(vec!["staff", "faculty"]),
        );
        assert!(allows(&policy, &attributes));

        attributes.insert("memberof".to_string(), AttributeValue::from(vec!["staff"]));
        assert!(!allows(&policy, &attributes));
    }

    #[test]
    fn test_numeric_attribute_coerced_to_string() {
        let policy = AccessPolicy::builder()
            .required_attribute("clearance", ["^[3-5]$"])
            .build();

        let attributes: PrincipalAttributes =
            serde_json::from_str(r#"{"clearance": 4}"#).unwrap();
        assert!(allows(&policy, &attributes));

        let attributes: PrincipalAttributes =
            serde_json::from_str(r#"{"clearance": 7}"#).unwrap();
        assert!(!allows(&policy, &attributes));
    }
}

// =============================================================================
// 3. Rejected attributes
// =============================================================================

mod rejected_attributes {
    use super::*;

    #[test]
    fn test_rejected_only_policy() {
        let policy = AccessPolicy::builder()
            .rejected_attribute("status", ["suspended"])
            .build();

        assert!(!allows(&policy, &attrs(&[("status", "suspended")])));
        assert!(allows(&policy, &attrs(&[("status", "active")])));
    }

    #[test]
    fn test_reject_takes_precedence() {
        let policy = AccessPolicy::builder()
            .required_attribute("role", ["admin"])
            .rejected_attribute("status", ["suspended"])
            .build();

        let attributes = attrs(&[("role", "admin"), ("status", "suspended")]);
        assert!(!allows(&policy, &attributes));

        let attributes = attrs(&[("role", "admin"), ("status", "active")]);
        assert!(allows(&policy, &attributes));
    }

    #[test]
    fn test_same_name_in_both_rule_sets() {
        let policy = AccessPolicy::builder()
            .required_attribute("memberof", ["staff"])
            .rejected_attribute("memberof", ["contractor"])
            .build();

        let mut attributes = PrincipalAttributes::new();
        attributes.insert(
            "memberof".to_string(),
            AttributeValue::from(vec!["staff", "contractor"]),
        );
        assert!(!allows(&policy, &attributes));

        attributes.insert("memberof".to_string(), AttributeValue::from("staff"));
        assert!(allows(&policy, &attributes));
    }

    #[test]
    fn test_require_all_needs_every_rejected_name_to_reject() {
        let policy = AccessPolicy::builder()
            .rejected_attribute("status", ["suspended"])
            .rejected_attribute("locked", ["true"])
            .build();

        assert!(allows(
            &policy,
            &attrs(&[("status", "suspended"), ("uid", "casuser")])
        ));
        assert!(!allows(
            &policy,
            &attrs(&[("status", "suspended"), ("locked", "false")])
        ));
    }

    #[test]
    fn test_any_presence_rejects_on_one_name() {
        let policy = AccessPolicy::builder()
            .require_all_attributes(false)
            .rejected_attribute("status", ["suspended"])
            .rejected_attribute("locked", ["true"])
            .build();

        assert!(!allows(
            &policy,
            &attrs(&[("status", "suspended"), ("uid", "casuser")])
        ));
    }

    #[test]
    fn test_rejected_names_absent_falls_through_to_required() {
        let policy = AccessPolicy::builder()
            .required_attribute("role", ["admin"])
            .rejected_attribute("status", ["suspended"])
            .build();

        assert!(allows(&policy, &attrs(&[("role", "admin"), ("uid", "casuser")])));
    }
}

// =============================================================================
// 4. Value matching
// =============================================================================

mod value_matching {
    use super::*;

    #[rstest]
    #[case(true, "admin", true)]
    #[case(true, "ADMIN", true)]
    #[case(false, "admin", false)]
    #[case(false, "Admin", true)]
    fn test_case_sensitivity(
        #[case] case_insensitive: bool,
        #[case] value: &str,
        #[case] expected: bool,
    ) {
        let policy = AccessPolicy::builder()
            .case_insensitive(case_insensitive)
            .required_attribute("role", ["Admin"])
            .build();
        assert_eq!(allows(&policy, &attrs(&[("role", value)])), expected);
    }

    #[rstest]
    #[case("^adm.*", "administrator", true)]
    #[case("adm", "sysadmin", true)]
    #[case("^adm", "sysadmin", false)]
    #[case("^admin$", "administrator", false)]
    #[case("staff|faculty", "faculty", true)]
    fn test_patterns_match_anywhere(
        #[case] pattern: &str,
        #[case] value: &str,
        #[case] expected: bool,
    ) {
        let policy = AccessPolicy::builder()
            .required_attribute("role", [pattern])
            .build();
        assert_eq!(allows(&policy, &attrs(&[("role", value)])), expected);
    }

    #[test]
    fn test_invalid_pattern_uses_exact_matching() {
        let policy = AccessPolicy::builder()
            .required_attribute("group", ["[ops", "admins"])
            .build();

        assert!(allows(&policy, &attrs(&[("group", "[ops")])));
        assert!(allows(&policy, &attrs(&[("group", "admins")])));
        assert!(!allows(&policy, &attrs(&[("group", "all-admins")])));
    }

    #[test]
    fn test_exact_matching_ignores_case_insensitive_flag() {
        let policy = AccessPolicy::builder()
            .case_insensitive(true)
            .required_attribute("group", ["[Ops"])
            .build();

        assert!(allows(&policy, &attrs(&[("group", "[Ops")])));
        assert!(!allows(&policy, &attrs(&[("group", "[ops")])));
    }

    #[test]
    fn test_invalid_pattern_on_one_attribute_keeps_others_as_patterns() {
        let policy = AccessPolicy::builder()
            .require_all_attributes(false)
            .required_attribute("group", ["[ops"])
            .required_attribute("role", ["^adm"])
            .build();

        assert!(allows(&policy, &attrs(&[("role", "administrator"), ("uid", "x")])));
    }

    #[test]
    fn test_required_rule_with_no_values_matches_any_value() {
        let policy = AccessPolicy::builder()
            .required_attribute("role", Vec::<String>::new())
            .build();
        assert!(allows(&policy, &attrs(&[("role", "admin")])));
        assert!(allows(&policy, &attrs(&[("role", "")])));
        // the name still has to be present
        assert!(!allows(&policy, &attrs(&[("dept", "it")])));
    }

    #[test]
    fn test_rejected_rule_with_no_values_vetoes_any_value() {
        let policy = AccessPolicy::builder()
            .rejected_attribute("status", Vec::<String>::new())
            .build();
        assert!(!allows(&policy, &attrs(&[("status", "active")])));
        assert!(allows(&policy, &attrs(&[("uid", "casuser")])));
    }

    fn with_empty_values(name: &str) -> PrincipalAttributes {
        let mut attributes = attrs(&[("uid", "casuser")]);
        attributes.insert(name.to_string(), AttributeValue::from(Vec::<String>::new()));
        attributes
    }

    #[rstest]
    #[case(vec!["admin"])]
    #[case(vec![])]
    fn test_required_name_with_no_values_does_not_match(#[case] rule: Vec<&str>) {
        let policy = AccessPolicy::builder()
            .required_attribute("role", rule)
            .build();
        assert!(!allows(&policy, &with_empty_values("role")));
    }

    #[rstest]
    #[case(vec!["suspended"])]
    #[case(vec![])]
    fn test_rejected_name_with_no_values_does_not_veto(#[case] rule: Vec<&str>) {
        let policy = AccessPolicy::builder()
            .rejected_attribute("status", rule)
            .build();
        assert!(allows(&policy, &with_empty_values("status")));
    }
}

// =============================================================================
// 5. Attribute count precheck
// =============================================================================

mod precheck {
    use super::*;

    #[test]
    fn test_fewer_attributes_than_required_rules() {
        let policy = AccessPolicy::builder()
            .require_all_attributes(false)
            .required_attribute("role", ["admin"])
            .required_attribute("dept", ["it"])
            .build();

        // would match under ANY presence, but the count check comes first
        assert!(!allows(&policy, &attrs(&[("role", "admin")])));
        assert!(
            !policy.enough_attributes_available_to_process("casuser", &attrs(&[("role", "admin")]))
        );
    }

    #[test]
    fn test_fewer_attributes_than_rejected_rules() {
        let policy = AccessPolicy::builder()
            .require_all_attributes(false)
            .required_attribute("role", ["admin"])
            .rejected_attribute("status", ["suspended"])
            .rejected_attribute("locked", ["true"])
            .build();

        assert!(!allows(&policy, &attrs(&[("role", "admin")])));
        assert!(allows(&policy, &attrs(&[("role", "admin"), ("uid", "casuser")])));
    }

    #[test]
    fn test_counts_ignore_attribute_names() {
        let policy = AccessPolicy::builder()
            .required_attribute("role", ["admin"])
            .build();

        assert!(
            policy.enough_attributes_available_to_process("casuser", &attrs(&[("uid", "casuser")]))
        );
    }
}

// =============================================================================
// 6. Shared policy
// =============================================================================

mod shared_policy {
    use super::*;

    #[test]
    fn test_strategy_trait_object() {
        let shared = SharedPolicy::new(
            AccessPolicy::builder()
                .required_attribute("role", ["admin"])
                .build(),
        );
        let strategy: &dyn AccessStrategy = &shared;
        assert!(strategy.do_principal_attributes_allow_service_access(
            "casuser",
            &attrs(&[("role", "admin")])
        ));

        shared.replace(AccessPolicy::new(true, false));
        assert!(!strategy.is_service_access_allowed_for_sso());
        assert!(strategy.do_principal_attributes_allow_service_access(
            "casuser",
            &attrs(&[("role", "guest")])
        ));
    }
}
