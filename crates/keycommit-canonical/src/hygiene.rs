use crate::identifiers::ProfileId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hygiene status for canonicalization attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HygieneStatus {
    /// The input was canonicalizable without issues.
    Ok,
    /// The input contained unzoned timestamps whose instant is unknown.
    Ambiguous,
    /// Information was dropped (opaque values stringified, colliding keys tie-broken).
    Lossy,
    /// The input was invalid and must be rejected.
    Invalid,
}

/// Stable warning code emitted by canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HygieneWarning(String);

impl HygieneWarning {
    /// Creates a warning from a literal code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The warning code.
    pub fn code(&self) -> &str {
        &self.0
    }
}

/// Hygiene reports produced during canonicalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HygieneReport {
    /// Overall hygiene status.
    pub status: HygieneStatus,
    /// Stable warning codes, each listed once.
    pub warnings: Vec<HygieneWarning>,
    /// Occurrence counts keyed by snake_case metric name.
    pub metrics: BTreeMap<String, u64>,
    /// Identifier of the options profile that produced the text.
    pub profile_id: ProfileId,
}

impl HygieneReport {
    /// Empty report with `Ok` status.
    pub fn new(profile_id: ProfileId) -> Self {
        Self {
            status: HygieneStatus::Ok,
            warnings: vec![],
            metrics: BTreeMap::new(),
            profile_id,
        }
    }

    /// Records one occurrence of `code`, raising the status to at least `status`.
    pub(crate) fn record(&mut self, code: &str, metric: &str, status: HygieneStatus) {
        if !self.warnings.iter().any(|w| w.code() == code) {
            self.warnings.push(HygieneWarning::new(code));
        }
        self.metrics
            .entry(metric.to_string())
            .and_modify(|count| *count += 1)
            .or_insert(1);
        self.status = self.status.max(status);
    }
}
