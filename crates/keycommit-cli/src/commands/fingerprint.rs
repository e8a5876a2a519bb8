//! Fingerprint command implementation.

use keycommit_canonical::{CanonicalOptions, Canonicalizer};

use crate::input::read_json_value;

pub fn run(
    input: Option<String>,
    options: CanonicalOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let canonicalizer = Canonicalizer::new(options)?;
    let value = read_json_value(input.as_deref())?;

    let key = canonicalizer
        .fingerprint(&value)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;

    println!("{}", key);
    Ok(())
}
