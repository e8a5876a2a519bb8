pub mod canonicalize;
pub mod fingerprint;
pub mod hash;
pub mod summarize;
