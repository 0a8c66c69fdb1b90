//! Property tests over the evaluators.

use proptest::prelude::*;
use serde_json::json;

use rule_engine::RuleEngine;
use rule_types::{Jurisdiction, RuleRecord, Severity};

fn range_engine(min: f64, max: f64) -> RuleEngine {
    let record: RuleRecord = serde_json::from_value(json!({
        "id": "age_range",
        "form_type": "family_law",
        "field_name": "age",
        "rule_type": "range",
        "rule_data": {"min": min, "max": max},
        "jurisdiction": "ALL",
        "rule_name": "age_range",
    }))
    .unwrap();
    RuleEngine::with_rules(vec![record]).unwrap()
}

proptest! {
    #[test]
    fn range_issue_iff_value_outside_inclusive_bounds(value in -1000i64..1000) {
        let engine = range_engine(18.0, 65.0);
        let out = engine.validate_field(
            "family_law",
            "age",
            Some(&value.to_string()),
            &Jurisdiction::default(),
        );
        let in_bounds = (18..=65).contains(&value);
        prop_assert_eq!(out.issues.is_empty(), in_bounds);
        // An out-of-bounds value violates exactly one bound.
        if !in_bounds {
            prop_assert_eq!(out.issues.len(), 1);
            prop_assert_eq!(out.issues[0].severity, Severity::Medium);
        }
    }

    #[test]
    fn non_numeric_values_never_trigger_range_issues(value in "[a-zA-Z ]{1,16}") {
        // Covers "inf"/"nan" spellings too: only a leading digit sequence
        // counts as a number for range rules.
        let engine = range_engine(18.0, 65.0);
        let out = engine.validate_field(
            "family_law",
            "age",
            Some(&value),
            &Jurisdiction::default(),
        );
        prop_assert!(out.issues.is_empty());
    }

    #[test]
    fn all_scoped_rules_fire_for_any_jurisdiction(code in "[A-Z]{2}") {
        let record: RuleRecord = serde_json::from_value(json!({
            "id": "everywhere",
            "form_type": "family_law",
            "field_name": "petitioner_name",
            "rule_type": "required",
            "rule_data": {"required": true},
            "jurisdiction": "ALL",
            "rule_name": "everywhere",
        }))
        .unwrap();
        let engine = RuleEngine::with_rules(vec![record]).unwrap();
        let out = engine.validate_field(
            "family_law",
            "petitioner_name",
            Some(""),
            &Jurisdiction::new(&code),
        );
        prop_assert_eq!(out.issues.len(), 1);
    }

    #[test]
    fn scoped_rules_fire_only_for_their_own_jurisdiction(code in "[A-Z]{2}") {
        let record: RuleRecord = serde_json::from_value(json!({
            "id": "ca_only",
            "form_type": "family_law",
            "field_name": "petitioner_name",
            "rule_type": "required",
            "rule_data": {"required": true},
            "jurisdiction": "CA",
            "rule_name": "ca_only",
        }))
        .unwrap();
        let engine = RuleEngine::with_rules(vec![record]).unwrap();
        let out = engine.validate_field(
            "family_law",
            "petitioner_name",
            Some(""),
            &Jurisdiction::new(&code),
        );
        prop_assert_eq!(out.issues.is_empty(), code != "CA");
    }
}
