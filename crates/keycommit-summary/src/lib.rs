//! Content-addressed summary records.
//!
//! A [`Summarizer`] turns text into a [`Summary`] whose `key` is the
//! fingerprint of the text's canonical form. [`StubSummarizer`] derives every
//! field from that key, so the same text always yields the same record.
//!
//! ```rust
//! use keycommit_canonical::{fingerprint, Value};
//! use keycommit_summary::{StubSummarizer, Summarizer};
//!
//! let summary = StubSummarizer.summarize("ship it\r\n")?;
//! assert_eq!(summary.key, fingerprint(&Value::from("ship it\n"))?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Error types for summarization.
pub mod errors;
/// Deterministic stub implementation.
pub mod stub;
/// Summary record type.
pub mod summary;

pub use errors::SummaryError;
pub use stub::StubSummarizer;
pub use summary::Summary;

/// Produces a summary for a piece of text.
pub trait Summarizer {
    /// Summarizes `text`.
    fn summarize(&self, text: &str) -> Result<Summary, SummaryError>;
}
