//! Compliance rule validation engine.
//!
//! Loads jurisdiction- and form-scoped validation rules from a
//! [`RuleSource`], indexes them by `(form_type, field)`, and evaluates
//! field values or whole form submissions against the applicable rules.
//! The engine is a read-through cache over the rule store: the index is
//! disposable and fully rebuilt by [`RuleEngine::refresh`].

pub mod error;
pub mod evaluate;
pub mod index;
pub mod source;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use tracing::{debug, warn};

use rule_types::{FieldOutcome, Jurisdiction, RuleRecord, ValidationResult};

pub use error::{LoadError, SourceError};
pub use index::RuleIndex;
pub use source::{InMemoryRuleSource, RuleSource};

/// Validation engine over an indexed ruleset.
///
/// Readers take an `Arc` snapshot of the index, so validation calls run in
/// parallel and never observe a partially rebuilt index; `load`/`refresh`
/// build a replacement off to the side and swap it in.
pub struct RuleEngine {
    source: Arc<dyn RuleSource>,
    index: RwLock<Arc<RuleIndex>>,
}

impl RuleEngine {
    /// Create an engine with an empty index. Call [`RuleEngine::load`]
    /// (or `refresh`) before validating.
    pub fn new(source: Arc<dyn RuleSource>) -> Self {
        Self {
            source,
            index: RwLock::new(Arc::new(RuleIndex::new())),
        }
    }

    /// Convenience for tests and embedded use: wrap the records in an
    /// in-memory source and perform the initial load.
    pub fn with_rules(records: Vec<RuleRecord>) -> Result<Self, LoadError> {
        let engine = Self::new(Arc::new(InMemoryRuleSource::new(records)));
        engine.load()?;
        Ok(engine)
    }

    /// Fetch rules from the source and merge them into the index.
    ///
    /// Buckets are appended to, never cleared: calling `load` twice without
    /// a `refresh` duplicates bucket contents. This is the load-on-construct
    /// policy; rule-authoring changes go through [`RuleEngine::refresh`].
    /// On fetch failure the index is left untouched.
    pub fn load(&self) -> Result<(), LoadError> {
        let records = self.source.fetch_active_rules()?;
        let mut next = RuleIndex::clone(&self.snapshot());
        let loaded = Self::insert_records(&mut next, &records);
        debug!(fetched = records.len(), loaded, total = next.len(), "loaded compliance rules");
        self.swap(next);
        Ok(())
    }

    /// Clear the index and rebuild it from the source.
    ///
    /// The rebuild happens off to the side and is swapped in only on
    /// success, so a failed refresh never blanks a working index.
    pub fn refresh(&self) -> Result<(), LoadError> {
        let records = self.source.fetch_active_rules()?;
        let mut next = RuleIndex::new();
        let loaded = Self::insert_records(&mut next, &records);
        debug!(fetched = records.len(), loaded, "refreshed compliance rules");
        self.swap(next);
        Ok(())
    }

    fn insert_records(index: &mut RuleIndex, records: &[RuleRecord]) -> usize {
        let mut loaded = 0;
        for record in records {
            match record.parse() {
                Ok(rule) => {
                    index.insert(rule);
                    loaded += 1;
                }
                // Malformed rules are skipped; the rest of the batch loads.
                Err(err) => warn!(rule_id = %record.id, %err, "skipping malformed rule"),
            }
        }
        loaded
    }

    /// Evaluate one field value against every applicable rule.
    ///
    /// Applicable rules are the form type's general bucket followed by the
    /// field's bucket, filtered to the caller's jurisdiction (rules scoped
    /// `ALL` always apply). All applicable rules fire; none short-circuits
    /// another. Unknown form types and fields return an empty outcome.
    pub fn validate_field(
        &self,
        form_type: &str,
        field_name: &str,
        value: Option<&str>,
        jurisdiction: &Jurisdiction,
    ) -> FieldOutcome {
        let index = self.snapshot();
        let mut out = FieldOutcome::default();
        for rule in index.candidates(form_type, field_name) {
            if !rule.jurisdiction.applies_to(jurisdiction) {
                continue;
            }
            evaluate::apply_rule(rule, field_name, value, jurisdiction, &mut out);
        }
        out
    }

    /// Evaluate a whole submission, pooling issues across fields.
    ///
    /// Issues are kept verbatim (identical issues on different fields are
    /// field-scoped); suggestions are de-duplicated, first occurrence kept.
    /// The form is compliant iff no pooled issue is high severity.
    ///
    /// Only submitted fields are consulted: a form-wide rule fires through
    /// the general bucket of each submitted field's lookup, so a form type
    /// with no submitted fields is never checked here. Callers that need a
    /// form-wide rule checked unconditionally must invoke
    /// [`RuleEngine::validate_field`] for a field of that form type.
    pub fn validate_form(
        &self,
        form_type: &str,
        form_data: &HashMap<String, String>,
        jurisdiction: &Jurisdiction,
    ) -> ValidationResult {
        let mut issues = Vec::new();
        let mut suggestions: Vec<String> = Vec::new();

        for (field_name, value) in form_data {
            let outcome = self.validate_field(form_type, field_name, Some(value), jurisdiction);
            issues.extend(outcome.issues);
            for suggestion in outcome.suggestions {
                if !suggestions.contains(&suggestion) {
                    suggestions.push(suggestion);
                }
            }
        }

        let is_compliant = !issues.iter().any(|issue| issue.is_high());
        ValidationResult {
            is_compliant,
            issues,
            suggestions,
            checked_at: Utc::now(),
        }
    }

    /// Number of rules currently indexed.
    pub fn rule_count(&self) -> usize {
        self.snapshot().len()
    }

    fn snapshot(&self) -> Arc<RuleIndex> {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn swap(&self, next: RuleIndex) {
        *self.index.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
    }
}
