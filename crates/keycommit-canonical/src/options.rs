use serde::{Deserialize, Serialize};

use crate::identifiers::ProfileId;
use crate::validation::ValidationError;

/// Reserved mapping key that marks a base64-encoded byte blob.
pub const DEFAULT_BYTES_MARKER: &str = "__bytes__";

/// Profile identifier of the default options.
pub const DEFAULT_PROFILE_ID: &str = "keycommit-canonical-v1";

/// Default nesting limit, matching serde_json's recursion limit.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// What to do with values outside the recognized set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpaquePolicy {
    /// Fail with `UnsupportedType`.
    #[default]
    Reject,
    /// Emit the value's text representation. Distinct values with the same
    /// text will share a fingerprint.
    Stringify,
}

/// What to do when two mapping keys coerce to the same text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateKeyPolicy {
    /// Fail with `DuplicateKeyAfterCoercion`.
    #[default]
    Reject,
    /// Keep the entry whose canonical value serializes smallest.
    KeepLeast,
}

/// Options controlling canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanonicalOptions {
    /// Profile reported in hygiene reports.
    pub profile_id: ProfileId,
    /// Reserved key used for byte blobs. Mapping keys equal to it are rejected.
    pub bytes_marker: String,
    /// Opaque value handling.
    pub opaque: OpaquePolicy,
    /// Key collision handling.
    pub duplicate_keys: DuplicateKeyPolicy,
    /// Maximum container nesting.
    pub max_depth: usize,
}

impl Default for CanonicalOptions {
    fn default() -> Self {
        Self {
            profile_id: ProfileId::parse(DEFAULT_PROFILE_ID).expect("valid default profile"),
            bytes_marker: DEFAULT_BYTES_MARKER.to_string(),
            opaque: OpaquePolicy::default(),
            duplicate_keys: DuplicateKeyPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CanonicalOptions {
    /// Checks settings that serde cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bytes_marker.is_empty() {
            return Err(ValidationError::PatternMismatch {
                field: "bytes_marker",
                value: self.bytes_marker.clone(),
            });
        }
        if self.max_depth == 0 {
            return Err(ValidationError::OutOfBounds {
                field: "max_depth",
                value: self.max_depth.to_string(),
            });
        }
        Ok(())
    }

    /// Loads options from JSON, filling omitted fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }
}

/// Error loading [`CanonicalOptions`].
#[derive(thiserror::Error, Debug)]
pub enum OptionsError {
    /// The document was not valid options JSON.
    #[error("invalid options JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// A setting was out of range.
    #[error("invalid options: {0}")]
    Invalid(#[from] ValidationError),
}
