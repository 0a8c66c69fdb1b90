//! In-memory rule index.
//!
//! Rules are bucketed by `(form_type, field)`; form-wide rules land in a
//! synthetic "general" bucket for their form type. The index is built once
//! per load/refresh cycle and never mutated while readers hold it.

use std::collections::HashMap;

use rule_types::ComplianceRule;

/// Synthetic field key for form-wide rules.
pub const GENERAL_FIELD: &str = "general";

#[derive(Debug, Clone, Default)]
pub struct RuleIndex {
    buckets: HashMap<(String, String), Vec<ComplianceRule>>,
}

impl RuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule to its bucket. Insertion order inside a bucket is
    /// fetch order, which is also evaluation order.
    pub fn insert(&mut self, rule: ComplianceRule) {
        let field = rule
            .field_name
            .clone()
            .unwrap_or_else(|| GENERAL_FIELD.to_string());
        self.buckets
            .entry((rule.form_type.clone(), field))
            .or_default()
            .push(rule);
    }

    fn bucket(&self, form_type: &str, field: &str) -> &[ComplianceRule] {
        self.buckets
            .get(&(form_type.to_string(), field.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All rules applicable to a field: the form type's general bucket
    /// first, then the field-specific bucket. Form-wide policy evaluates
    /// before field-level refinement; every applicable rule still fires.
    pub fn candidates<'a>(
        &'a self,
        form_type: &str,
        field_name: &str,
    ) -> impl Iterator<Item = &'a ComplianceRule> {
        self.bucket(form_type, GENERAL_FIELD)
            .iter()
            .chain(self.bucket(form_type, field_name).iter())
    }

    /// Total number of indexed rules.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
