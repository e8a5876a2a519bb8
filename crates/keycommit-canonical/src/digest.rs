use sha2::{Digest as Sha2Digest, Sha256};

use crate::identifiers::ContentKey;
use crate::validation::ValidationError;

/// Error raised by the hashing stage.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DigestError {
    /// Input bytes were not valid UTF-8 text.
    #[error("input is not valid UTF-8 (valid up to byte {valid_up_to})")]
    NonUnicodeInput {
        /// Length of the longest valid UTF-8 prefix.
        valid_up_to: usize,
    },
    /// The digest did not form a valid content key.
    #[error("invalid content key: {0}")]
    InvalidContentKey(#[from] ValidationError),
}

/// SHA-256 of the UTF-8 encoding of `text`, as 64 lowercase hex characters.
///
/// ```rust
/// use keycommit_canonical::sha256_hex;
///
/// assert_eq!(
///     sha256_hex("abc"),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn sha256_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Like [`sha256_hex`], for bytes that have not been validated as text yet.
pub fn sha256_hex_bytes(bytes: &[u8]) -> Result<String, DigestError> {
    let text = std::str::from_utf8(bytes).map_err(|err| DigestError::NonUnicodeInput {
        valid_up_to: err.valid_up_to(),
    })?;
    Ok(sha256_hex(text))
}

/// [`sha256_hex`] of `text`, as a validated [`ContentKey`].
pub fn content_key(text: &str) -> Result<ContentKey, DigestError> {
    Ok(ContentKey::parse(sha256_hex(text))?)
}
