//! Compliance rule records and their parsed form.
//!
//! Rules arrive from the backing store as [`RuleRecord`]s carrying an
//! untyped `rule_data` payload. [`RuleRecord::parse`] turns each record into
//! a [`ComplianceRule`] with a tagged [`RuleData`] variant, so evaluators
//! dispatch exhaustively instead of probing JSON keys per call. Parsing also
//! compiles format patterns once, up front.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::jurisdiction::Jurisdiction;
use crate::types::{IssueKind, Severity};

/// A rule as fetched from the backing store, before payload validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleRecord {
    pub id: String,
    /// Document/form category the rule applies to (e.g. "family_law").
    pub form_type: String,
    /// Specific field governed by the rule, or `None` for a form-wide rule.
    #[serde(default)]
    pub field_name: Option<String>,
    pub rule_type: String,
    /// Shape depends on `rule_type`; validated by [`RuleRecord::parse`].
    #[serde(default)]
    pub rule_data: Value,
    #[serde(default = "Jurisdiction::all")]
    pub jurisdiction: Jurisdiction,
    /// Human-readable identifier surfaced in issues.
    pub rule_name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl RuleRecord {
    /// Whether the rule should be loaded at all: active and not expired.
    /// Expiry is checked only at load time, never mid-session.
    pub fn is_loadable(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expiry_date.map_or(true, |exp| exp > now)
    }

    /// Validate the payload against the declared rule_type.
    pub fn parse(&self) -> Result<ComplianceRule, RuleParseError> {
        let data = match self.rule_type.as_str() {
            "required" => RuleData::Required {
                required: self.rule_data["required"].as_bool().unwrap_or(false),
            },
            "format" => {
                let pattern = self.rule_data["pattern"]
                    .as_str()
                    .ok_or_else(|| RuleParseError::MissingKey {
                        rule: self.rule_name.clone(),
                        key: "pattern",
                    })?;
                let pattern =
                    Regex::new(pattern).map_err(|source| RuleParseError::InvalidPattern {
                        rule: self.rule_name.clone(),
                        source,
                    })?;
                RuleData::Format {
                    pattern,
                    error_message: string_key(&self.rule_data, "error_message"),
                    suggestion: string_key(&self.rule_data, "suggestion"),
                }
            }
            "range" => {
                let min = self.rule_data["min"].as_f64();
                let max = self.rule_data["max"].as_f64();
                if min.is_none() && max.is_none() {
                    return Err(RuleParseError::MissingKey {
                        rule: self.rule_name.clone(),
                        key: "min/max",
                    });
                }
                RuleData::Range { min, max }
            }
            "validation" => {
                let terms: Vec<String> = self.rule_data["forbidden_terms"]
                    .as_array()
                    .map(|arr| {
                        arr.iter()
                            .filter_map(|t| t.as_str())
                            .map(|t| t.to_string())
                            .collect()
                    })
                    .unwrap_or_default();
                if terms.is_empty() {
                    return Err(RuleParseError::MissingKey {
                        rule: self.rule_name.clone(),
                        key: "forbidden_terms",
                    });
                }
                let severity = match self.rule_data["severity"].as_str() {
                    Some("high") => Severity::High,
                    _ => Severity::Medium,
                };
                RuleData::ForbiddenTerms { terms, severity }
            }
            other => {
                return Err(RuleParseError::UnknownRuleType {
                    rule: self.rule_name.clone(),
                    rule_type: other.to_string(),
                })
            }
        };

        Ok(ComplianceRule {
            id: self.id.clone(),
            form_type: self.form_type.clone(),
            field_name: self.field_name.clone(),
            rule_name: self.rule_name.clone(),
            jurisdiction: self.jurisdiction.clone(),
            data,
        })
    }
}

fn string_key(data: &Value, key: &str) -> Option<String> {
    data[key].as_str().map(|s| s.to_string())
}

/// A validated rule, immutable once indexed. Updates require a reload.
#[derive(Debug, Clone)]
pub struct ComplianceRule {
    pub id: String,
    pub form_type: String,
    pub field_name: Option<String>,
    pub rule_name: String,
    pub jurisdiction: Jurisdiction,
    pub data: RuleData,
}

/// Payload variants, one per recognized rule_type.
#[derive(Debug, Clone)]
pub enum RuleData {
    /// Fires when the value is empty or whitespace-only.
    Required { required: bool },
    /// Fires when a non-empty value fails to match `pattern`.
    Format {
        pattern: Regex,
        error_message: Option<String>,
        suggestion: Option<String>,
    },
    /// Fires when a numeric value falls outside [min, max]. Boundaries are
    /// inclusive; non-numeric values are treated as inapplicable.
    Range { min: Option<f64>, max: Option<f64> },
    /// Case-insensitive substring scan; one issue per matching term.
    /// Stored rule_type is "validation".
    ForbiddenTerms { terms: Vec<String>, severity: Severity },
}

impl RuleData {
    pub fn kind(&self) -> IssueKind {
        match self {
            RuleData::Required { .. } => IssueKind::Required,
            RuleData::Format { .. } => IssueKind::Format,
            RuleData::Range { .. } => IssueKind::Range,
            RuleData::ForbiddenTerms { .. } => IssueKind::Validation,
        }
    }
}

/// A record whose payload cannot back its declared rule_type. Policy is
/// skip-and-log: the rule never fires, other rules are unaffected.
#[derive(Debug, Error)]
pub enum RuleParseError {
    #[error("rule '{rule}' has unrecognized rule_type '{rule_type}'")]
    UnknownRuleType { rule: String, rule_type: String },

    #[error("rule '{rule}' is missing rule_data key '{key}'")]
    MissingKey { rule: String, key: &'static str },

    #[error("rule '{rule}' has an invalid pattern: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(rule_type: &str, rule_data: Value) -> RuleRecord {
        RuleRecord {
            id: "r1".to_string(),
            form_type: "family_law".to_string(),
            field_name: Some("petitioner_name".to_string()),
            rule_type: rule_type.to_string(),
            rule_data,
            jurisdiction: Jurisdiction::all(),
            rule_name: "test_rule".to_string(),
            is_active: true,
            expiry_date: None,
        }
    }

    #[test]
    fn test_parses_required_rule() {
        let rule = record("required", json!({"required": true})).parse().unwrap();
        assert!(matches!(rule.data, RuleData::Required { required: true }));
    }

    #[test]
    fn test_required_defaults_to_false_when_key_missing() {
        let rule = record("required", json!({})).parse().unwrap();
        assert!(matches!(rule.data, RuleData::Required { required: false }));
    }

    #[test]
    fn test_parses_format_rule_and_compiles_pattern() {
        let rule = record(
            "format",
            json!({"pattern": r"^\d{3}-\d{4}$", "suggestion": "Use NNN-NNNN"}),
        )
        .parse()
        .unwrap();
        match rule.data {
            RuleData::Format {
                pattern, suggestion, ..
            } => {
                assert!(pattern.is_match("123-4567"));
                assert_eq!(suggestion.as_deref(), Some("Use NNN-NNNN"));
            }
            other => panic!("expected format rule, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_invalid_pattern() {
        let err = record("format", json!({"pattern": "("})).parse().unwrap_err();
        assert!(matches!(err, RuleParseError::InvalidPattern { .. }));
    }

    #[test]
    fn test_rejects_format_rule_without_pattern() {
        let err = record("format", json!({})).parse().unwrap_err();
        assert!(matches!(
            err,
            RuleParseError::MissingKey { key: "pattern", .. }
        ));
    }

    #[test]
    fn test_parses_range_rule_with_single_bound() {
        let rule = record("range", json!({"min": 1000})).parse().unwrap();
        assert!(matches!(
            rule.data,
            RuleData::Range {
                min: Some(m),
                max: None
            } if m == 1000.0
        ));
    }

    #[test]
    fn test_rejects_range_rule_without_bounds() {
        assert!(record("range", json!({})).parse().is_err());
    }

    #[test]
    fn test_parses_forbidden_terms_with_severity() {
        let rule = record(
            "validation",
            json!({"forbidden_terms": ["guarantee", "promise"], "severity": "high"}),
        )
        .parse()
        .unwrap();
        match rule.data {
            RuleData::ForbiddenTerms { terms, severity } => {
                assert_eq!(terms, vec!["guarantee", "promise"]);
                assert_eq!(severity, Severity::High);
            }
            other => panic!("expected forbidden terms, got {:?}", other),
        }
    }

    #[test]
    fn test_forbidden_terms_severity_defaults_to_medium() {
        let rule = record("validation", json!({"forbidden_terms": ["guarantee"]}))
            .parse()
            .unwrap();
        assert!(matches!(
            rule.data,
            RuleData::ForbiddenTerms {
                severity: Severity::Medium,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_rule_type() {
        let err = record("cross_field", json!({})).parse().unwrap_err();
        assert!(matches!(err, RuleParseError::UnknownRuleType { .. }));
    }

    #[test]
    fn test_loadable_respects_active_flag_and_expiry() {
        let now = Utc::now();
        let mut rec = record("required", json!({"required": true}));
        assert!(rec.is_loadable(now));

        rec.is_active = false;
        assert!(!rec.is_loadable(now));

        rec.is_active = true;
        rec.expiry_date = Some(now - chrono::Duration::days(1));
        assert!(!rec.is_loadable(now));

        rec.expiry_date = Some(now + chrono::Duration::days(1));
        assert!(rec.is_loadable(now));
    }

    #[test]
    fn test_record_deserializes_with_defaults() {
        let rec: RuleRecord = serde_json::from_value(json!({
            "id": "r9",
            "form_type": "real_estate",
            "rule_type": "range",
            "rule_data": {"min": 1000},
            "rule_name": "price_floor"
        }))
        .unwrap();
        assert!(rec.is_active);
        assert!(rec.field_name.is_none());
        assert!(rec.jurisdiction.is_all());
    }
}
