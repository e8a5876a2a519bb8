//! Input and options loading shared by commands.

use keycommit_canonical::{CanonicalOptions, DuplicateKeyPolicy, OpaquePolicy, Value};
use std::io::{self, Read};

/// Reads raw bytes from a file or stdin.
pub fn read_bytes(input: Option<&str>) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    match input {
        Some(path) => {
            Ok(std::fs::read(path).map_err(|e| format!("Failed to read file {}: {}", path, e))?)
        }
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Reads UTF-8 text from a file or stdin.
pub fn read_text(input: Option<&str>) -> Result<String, Box<dyn std::error::Error>> {
    let bytes = read_bytes(input)?;
    Ok(String::from_utf8(bytes).map_err(|e| format!("Input is not valid UTF-8: {}", e))?)
}

/// Reads a JSON document and converts it to a canonicalizable value.
pub fn read_json_value(input: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let json_str = read_text(input)?;
    let json: serde_json::Value =
        serde_json::from_str(&json_str).map_err(|e| format!("Invalid JSON: {}", e))?;
    Ok(Value::from(json))
}

/// Loads options from an optional JSON file, then applies flag overrides.
pub fn load_options(
    config: Option<&str>,
    opaque: Option<OpaquePolicy>,
    duplicate_keys: Option<DuplicateKeyPolicy>,
) -> Result<CanonicalOptions, Box<dyn std::error::Error>> {
    let mut options = match config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read config {}: {}", path, e))?;
            CanonicalOptions::from_json(&json)?
        }
        None => CanonicalOptions::default(),
    };
    if let Some(opaque) = opaque {
        options.opaque = opaque;
    }
    if let Some(duplicate_keys) = duplicate_keys {
        options.duplicate_keys = duplicate_keys;
    }
    tracing::debug!(
        profile = %options.profile_id,
        opaque = ?options.opaque,
        duplicate_keys = ?options.duplicate_keys,
        "loaded options"
    );
    Ok(options)
}
