//! Deterministic canonical text and content keys for structured values.
//!
//! A [`Value`] is transformed into a [`CanonicalValue`] with every ordering
//! decision fixed (mapping keys sorted, sets ordered by content, newlines and
//! timezones normalized), rendered as compact text, and hashed with SHA-256:
//!
//! ```rust
//! use keycommit_canonical::{canonicalize, fingerprint, sha256_hex, Value};
//!
//! let value = Value::map([("b", 2), ("a", 1)]);
//! let text = canonicalize(&value)?;
//! assert_eq!(text, r#"{"a":1,"b":2}"#);
//! assert_eq!(fingerprint(&value)?.as_str(), sha256_hex(&text));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
#![deny(missing_docs)]

/// Canonical tree produced by the transform.
pub mod canonical_value;
/// Canonicalizer facade and its error type.
pub mod canonicalizer;
/// SHA-256 hex digests.
pub mod digest;
/// Hygiene report types emitted during canonicalization.
pub mod hygiene;
/// Validated string newtypes.
pub mod identifiers;
/// Canonicalization policies and limits.
pub mod options;
/// Canonical tree to text.
pub mod serializer;
/// Input value to canonical tree.
pub mod transform;
/// Validation helpers used by canonical types.
pub mod validation;
/// Input value model.
pub mod value;

pub use canonical_value::CanonicalValue;
pub use canonicalizer::{
    canonicalize, fingerprint, CanonicalizationError, CanonicalizationResult, Canonicalizer,
};
pub use digest::{content_key, sha256_hex, sha256_hex_bytes, DigestError};
pub use hygiene::{HygieneReport, HygieneStatus, HygieneWarning};
pub use identifiers::{ContentKey, ProfileId, Timestamp};
pub use options::{
    CanonicalOptions, DuplicateKeyPolicy, OpaquePolicy, OptionsError, DEFAULT_BYTES_MARKER,
};
pub use serializer::serialize;
pub use validation::ValidationError;
pub use value::Value;
