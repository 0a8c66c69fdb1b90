//! Issue and result types produced by rule evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a validation issue. A form is compliant iff no issue is `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
}

/// Which evaluator produced an issue. Mirrors the rule_type of the
/// triggering rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Required,
    Format,
    Range,
    /// Free-text forbidden-term scan (stored rule_type "validation").
    Validation,
}

/// One violation of one rule, scoped to the field that was being evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    /// Back-reference to the triggering rule, for traceability.
    pub rule_name: String,
}

impl ValidationIssue {
    pub fn is_high(&self) -> bool {
        self.severity == Severity::High
    }
}

/// Result of evaluating a single field value against its applicable rules.
///
/// Suggestions may repeat here; de-duplication happens at form level.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldOutcome {
    pub issues: Vec<ValidationIssue>,
    pub suggestions: Vec<String>,
}

impl FieldOutcome {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Aggregated result of evaluating a whole form submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    /// True iff no pooled issue has high severity.
    pub is_compliant: bool,
    /// Field iteration order, then rule order within a field. Not
    /// de-duplicated: identical issues on different fields are field-scoped.
    pub issues: Vec<ValidationIssue>,
    /// De-duplicated remediation hints, first occurrence kept.
    pub suggestions: Vec<String>,
    pub checked_at: DateTime<Utc>,
}
