//! Per-rule-type evaluation.
//!
//! Each evaluator inspects one rule against one field value and pushes any
//! issues (and suggestions) into the outcome. Evaluators never fail: a rule
//! that does not apply to the value simply contributes nothing.

use rule_types::{
    ComplianceRule, FieldOutcome, Jurisdiction, RuleData, Severity, ValidationIssue,
};

/// Apply one applicable rule to a field value. `jurisdiction` is the
/// caller's, already matched against the rule's scope.
pub fn apply_rule(
    rule: &ComplianceRule,
    field_name: &str,
    value: Option<&str>,
    jurisdiction: &Jurisdiction,
    out: &mut FieldOutcome,
) {
    match &rule.data {
        RuleData::Required { required } => {
            if *required && is_blank(value) {
                out.issues.push(issue(
                    rule,
                    Severity::High,
                    format!("{} is required by {} law", field_name, jurisdiction),
                ));
            }
        }
        RuleData::Format {
            pattern,
            error_message,
            suggestion,
        } => {
            let Some(value) = non_empty(value) else {
                return;
            };
            if !pattern.is_match(value) {
                let message = error_message
                    .clone()
                    .unwrap_or_else(|| format!("Invalid format for {}", field_name));
                out.issues.push(issue(rule, Severity::Medium, message));
                if let Some(suggestion) = suggestion {
                    out.suggestions.push(suggestion.clone());
                }
            }
        }
        RuleData::Range { min, max } => {
            let Some(value) = non_empty(value) else {
                return;
            };
            // Non-numeric values make the rule inapplicable, not invalid.
            let Some(number) = parse_leading_float(value) else {
                return;
            };
            if let Some(min) = min {
                if number < *min {
                    out.issues.push(issue(
                        rule,
                        Severity::Medium,
                        format!("{} must be at least {}", field_name, min),
                    ));
                }
            }
            if let Some(max) = max {
                if number > *max {
                    out.issues.push(issue(
                        rule,
                        Severity::Medium,
                        format!("{} cannot exceed {}", field_name, max),
                    ));
                }
            }
        }
        RuleData::ForbiddenTerms { terms, severity } => {
            let Some(value) = non_empty(value) else {
                return;
            };
            let haystack = value.to_lowercase();
            for term in terms {
                if haystack.contains(&term.to_lowercase()) {
                    out.issues.push(issue(
                        rule,
                        *severity,
                        format!(
                            "{} contains potentially problematic term: \"{}\"",
                            field_name, term
                        ),
                    ));
                }
            }
        }
    }
}

fn issue(rule: &ComplianceRule, severity: Severity, message: String) -> ValidationIssue {
    ValidationIssue {
        kind: rule.data.kind(),
        severity,
        message,
        rule_name: rule.rule_name.clone(),
    }
}

/// Permissive float parse: reads an optional sign, digits, decimal point,
/// and exponent from the front of the string and ignores trailing text, so
/// "5abc" is 5 and "42nd Street" is 42. A value with no leading number is
/// not a number at all.
fn parse_leading_float(value: &str) -> Option<f64> {
    let s = value.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(&b'+') | Some(&b'-')) {
        end += 1;
    }
    let mut seen_digit = false;
    while bytes.get(end).is_some_and(|b| b.is_ascii_digit()) {
        end += 1;
        seen_digit = true;
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        while bytes.get(end).is_some_and(|b| b.is_ascii_digit()) {
            end += 1;
            seen_digit = true;
        }
    }
    if !seen_digit {
        return None;
    }
    // An exponent only counts when it carries digits; "1e" is just 1.
    let mantissa_end = end;
    if matches!(bytes.get(end), Some(&b'e') | Some(&b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(&b'+') | Some(&b'-')) {
            exp += 1;
        }
        let digits_start = exp;
        while bytes.get(exp).is_some_and(|b| b.is_ascii_digit()) {
            exp += 1;
        }
        end = if exp > digits_start { exp } else { mantissa_end };
    }
    s[..end].parse().ok()
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
