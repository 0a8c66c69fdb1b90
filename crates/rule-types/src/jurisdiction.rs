//! Jurisdiction codes for rule scoping.
//!
//! Rules carry a code such as "US", "CA", or "NY", or the sentinel `ALL`
//! meaning the rule applies regardless of the caller's jurisdiction. Codes
//! are open-ended strings rather than a closed enum: rule authors introduce
//! new jurisdictions without a code change.

use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel code matching every jurisdiction.
pub const ALL_JURISDICTIONS: &str = "ALL";

/// A normalized (uppercase, trimmed) jurisdiction code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Jurisdiction(String);

impl<'de> Deserialize<'de> for Jurisdiction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        Ok(Jurisdiction::new(&code))
    }
}

impl Jurisdiction {
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_uppercase())
    }

    /// The wildcard jurisdiction.
    pub fn all() -> Self {
        Self(ALL_JURISDICTIONS.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_all(&self) -> bool {
        self.0 == ALL_JURISDICTIONS
    }

    /// Whether a rule scoped to `self` applies to a caller in `other`.
    /// True for an exact match or when the rule is jurisdiction-wide.
    pub fn applies_to(&self, other: &Jurisdiction) -> bool {
        self.is_all() || self.0 == other.0
    }
}

/// Callers that omit a jurisdiction validate against US rules.
impl Default for Jurisdiction {
    fn default() -> Self {
        Self("US".to_string())
    }
}

impl From<&str> for Jurisdiction {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl std::fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
