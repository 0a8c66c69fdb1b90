//! Rule source boundary.
//!
//! The engine pulls its ruleset through [`RuleSource`]; the application's
//! composition root decides what backs it (a relational store, a config
//! file, a fixture set). [`InMemoryRuleSource`] is the reference
//! implementation used by tests and embedded deployments.

use std::sync::{PoisonError, RwLock};

use chrono::Utc;
use rule_types::RuleRecord;

use crate::error::SourceError;

/// Provides the current set of loadable compliance rules.
///
/// Contract: returns only rules that are active and unexpired at fetch
/// time, ordered by form type then field name (form-wide rules first
/// within a form type). Order within an index bucket follows fetch order.
pub trait RuleSource: Send + Sync {
    fn fetch_active_rules(&self) -> Result<Vec<RuleRecord>, SourceError>;
}

/// A source backed by an in-process record list. Records can be swapped
/// out between refreshes, mirroring external rule authoring.
#[derive(Debug, Default)]
pub struct InMemoryRuleSource {
    records: RwLock<Vec<RuleRecord>>,
}

impl InMemoryRuleSource {
    pub fn new(records: Vec<RuleRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Replace the full record set. Takes effect on the next fetch.
    pub fn set_records(&self, records: Vec<RuleRecord>) {
        *self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner) = records;
    }
}

impl RuleSource for InMemoryRuleSource {
    fn fetch_active_rules(&self) -> Result<Vec<RuleRecord>, SourceError> {
        let now = Utc::now();
        let mut records: Vec<RuleRecord> = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.is_loadable(now))
            .cloned()
            .collect();
        // Form-wide (fieldless) rules sort ahead of field-scoped ones.
        records.sort_by(|a, b| {
            (a.form_type.as_str(), a.field_name.as_deref())
                .cmp(&(b.form_type.as_str(), b.field_name.as_deref()))
        });
        Ok(records)
    }
}
