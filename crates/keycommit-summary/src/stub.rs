use chrono::{DateTime, SecondsFormat};
use keycommit_canonical::{sha256_hex, Canonicalizer, ContentKey, Timestamp, ValidationError, Value};

use crate::errors::SummaryError;
use crate::summary::Summary;
use crate::Summarizer;

/// Title adjectives, indexed by `seed % 7`.
pub const ADJECTIVES: [&str; 7] = [
    "Accurate",
    "Clear",
    "Concise",
    "Actionable",
    "Auditable",
    "Deterministic",
    "Reproducible",
];

/// Title nouns, indexed by `(seed / 7) % 6`.
pub const NOUNS: [&str; 6] = ["Commitment", "Change", "Decision", "Update", "Summary", "Outcome"];

/// Risk labels, indexed by `(seed / 13) % 5`. `none` yields no risks.
pub const RISKS: [&str; 5] = ["none", "timeline", "quality", "scope", "dependency"];

/// 2000-01-01T00:00:00Z as Unix seconds.
const CREATED_AT_EPOCH: i64 = 946_684_800;

const SECONDS_PER_DAY: u32 = 24 * 3600;

/// Summarizer that derives every field from the content key.
///
/// Same text, same canonical form, same key, same summary byte for byte.
/// No wall clock or randomness is involved.
#[derive(Debug, Clone, Default)]
pub struct StubSummarizer;

impl Summarizer for StubSummarizer {
    fn summarize(&self, text: &str) -> Result<Summary, SummaryError> {
        let canonical = Canonicalizer::default().canonicalize(&Value::from(text))?;
        let key = ContentKey::parse(sha256_hex(&canonical))?;
        let hex = key.as_str();

        let seed = u32::from_str_radix(&hex[..8], 16).map_err(|_| {
            ValidationError::PatternMismatch {
                field: "key",
                value: hex.to_string(),
            }
        })?;
        let adjective = ADJECTIVES[seed as usize % ADJECTIVES.len()];
        let noun = NOUNS[(seed / 7) as usize % NOUNS.len()];
        let risk = RISKS[(seed / 13) as usize % RISKS.len()];

        let bullets = vec![
            format!("Content key: {}…", &hex[..12]),
            format!("Canonical bytes: {}", canonical.len()),
            format!("Signal: {} → {}", &hex[12..20], &hex[20..28]),
        ];
        let components = vec![format!("comp:{}", &hex[58..62])];
        let risks = if risk == "none" {
            vec![]
        } else {
            vec![format!("Risk: {risk}")]
        };

        let offset = i64::from(seed % SECONDS_PER_DAY);
        let created_at = DateTime::from_timestamp(CREATED_AT_EPOCH + offset, 0)
            .ok_or_else(|| ValidationError::OutOfBounds {
                field: "created_at",
                value: offset.to_string(),
            })?
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        tracing::debug!(key = %key, bytes = canonical.len(), "built stub summary");

        Ok(Summary {
            title: format!("{adjective} {noun}"),
            bullets,
            risks,
            components,
            created_at: Timestamp::parse(created_at)?,
            key,
        })
    }
}
