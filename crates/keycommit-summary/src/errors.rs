use keycommit_canonical::{CanonicalizationError, ValidationError};
use thiserror::Error;

/// Errors that can occur while building a summary.
#[derive(Error, Debug)]
pub enum SummaryError {
    /// The input could not be canonicalized.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
    /// A derived field failed validation.
    #[error("invalid summary field: {0}")]
    Validation(#[from] ValidationError),
}
