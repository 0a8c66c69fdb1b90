pub mod jurisdiction;
pub mod rule;
pub mod types;

pub use jurisdiction::Jurisdiction;
pub use rule::{ComplianceRule, RuleData, RuleParseError, RuleRecord};
pub use types::{FieldOutcome, IssueKind, Severity, ValidationIssue, ValidationResult};
