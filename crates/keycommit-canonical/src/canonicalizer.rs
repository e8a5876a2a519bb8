use crate::canonical_value::CanonicalValue;
use crate::digest::{content_key, DigestError};
use crate::hygiene::{HygieneReport, HygieneStatus};
use crate::identifiers::ContentKey;
use crate::options::CanonicalOptions;
use crate::serializer::serialize;
use crate::transform::transform;
use crate::validation::ValidationError;
use crate::value::Value;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// A value outside the recognized set was rejected by the opaque policy.
    #[error("unsupported type {type_name} at {path}")]
    UnsupportedType {
        /// Location of the value.
        path: String,
        /// Host type name.
        type_name: String,
    },
    /// A mapping key cannot be coerced to text.
    #[error("{kind} cannot be used as a mapping key at {path}")]
    UnsupportedKey {
        /// Location of the mapping.
        path: String,
        /// Kind of the offending key.
        kind: &'static str,
    },
    /// Two distinct keys of one mapping coerce to the same text.
    #[error("duplicate key {key:?} after coercion at {path}")]
    DuplicateKeyAfterCoercion {
        /// Location of the mapping.
        path: String,
        /// The colliding coerced key.
        key: String,
    },
    /// A mapping key equals the reserved bytes marker.
    #[error("key {key:?} is reserved for byte blobs at {path}")]
    ReservedKey {
        /// Location of the mapping.
        path: String,
        /// The reserved key.
        key: String,
    },
    /// Nesting exceeds the configured limit.
    #[error("nesting deeper than {max} at {path}")]
    DepthLimitExceeded {
        /// Location of the container that would exceed the limit.
        path: String,
        /// Configured maximum depth.
        max: usize,
    },
    /// Hashing the canonical text failed.
    #[error("digest error: {0}")]
    Digest(#[from] DigestError),
    /// Generic failure.
    #[error("other error: {0}")]
    Other(String),
}

impl CanonicalizationError {
    /// Stable code recorded in hygiene reports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedType { .. } => "UnsupportedType",
            Self::UnsupportedKey { .. } => "UnsupportedKey",
            Self::DuplicateKeyAfterCoercion { .. } => "DuplicateKeyAfterCoercion",
            Self::ReservedKey { .. } => "ReservedKey",
            Self::Digest(_) => "Digest",
            Self::DepthLimitExceeded { .. } => "DepthLimitExceeded",
            Self::Other(_) => "Other",
        }
    }
}

/// Result of canonicalization.
#[derive(Debug)]
pub struct CanonicalizationResult {
    /// Canonical text for the input value.
    pub text: String,
    /// Hygiene report describing what the transform had to do.
    pub report: HygieneReport,
}

impl CanonicalizationResult {
    /// Canonical text as UTF-8 bytes.
    pub fn bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

/// Canonicalizer that emits deterministic text.
///
/// Holds no mutable state; one instance can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Canonicalizer {
    options: CanonicalOptions,
}

impl Canonicalizer {
    /// Creates a new canonicalizer for the provided options.
    ///
    /// Fails when `options` do not pass [`CanonicalOptions::validate`].
    pub fn new(options: CanonicalOptions) -> Result<Self, ValidationError> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Options in effect.
    pub fn options(&self) -> &CanonicalOptions {
        &self.options
    }

    /// Produces the canonical tree for `value`.
    pub fn transform(&self, value: &Value) -> Result<CanonicalValue, CanonicalizationError> {
        let mut report = HygieneReport::new(self.options.profile_id.clone());
        transform(value, &self.options, &mut report)
    }

    /// Produces canonical text.
    pub fn canonicalize(&self, value: &Value) -> Result<String, CanonicalizationError> {
        self.canonicalize_with_report(value)
            .map(|result| result.text)
            .map_err(|(err, _)| err)
    }

    /// Produces canonical text + hygiene report, returning the report even on error.
    pub fn canonicalize_with_report(
        &self,
        value: &Value,
    ) -> Result<CanonicalizationResult, (CanonicalizationError, HygieneReport)> {
        let mut report = HygieneReport::new(self.options.profile_id.clone());

        let text = transform(value, &self.options, &mut report).and_then(|tree| serialize(&tree));
        match text {
            Ok(text) => {
                tracing::debug!(
                    profile = %self.options.profile_id,
                    len = text.len(),
                    status = ?report.status,
                    "canonicalized value"
                );
                Ok(CanonicalizationResult { text, report })
            }
            Err(err) => {
                tracing::debug!(profile = %self.options.profile_id, error = %err, "canonicalization failed");
                report.record(err.code(), "errors", HygieneStatus::Invalid);
                Err((err, report))
            }
        }
    }

    /// SHA-256 of the canonical text, as a content key.
    pub fn fingerprint(&self, value: &Value) -> Result<ContentKey, CanonicalizationError> {
        let text = self.canonicalize(value)?;
        Ok(content_key(&text)?)
    }
}

/// Canonical text of `value` under the default options.
pub fn canonicalize(value: &Value) -> Result<String, CanonicalizationError> {
    Canonicalizer::default().canonicalize(value)
}

/// Fingerprint of `value` under the default options.
pub fn fingerprint(value: &Value) -> Result<ContentKey, CanonicalizationError> {
    Canonicalizer::default().fingerprint(value)
}
