use keycommit_canonical::{ContentKey, Timestamp};
use serde::{Deserialize, Serialize};

/// A summary record addressed by the fingerprint of its source text.
///
/// Only `key` carries a canonicalization guarantee; the other fields are
/// plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// `fingerprint(source_text)`.
    pub key: ContentKey,
    /// Short headline.
    pub title: String,
    /// Key points.
    pub bullets: Vec<String>,
    /// Flagged risks; empty when none.
    #[serde(default)]
    pub risks: Vec<String>,
    /// Affected components.
    #[serde(default)]
    pub components: Vec<String>,
    /// Creation time, UTC.
    pub created_at: Timestamp,
}
