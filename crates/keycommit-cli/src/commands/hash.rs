//! Hash command implementation.

use keycommit_canonical::sha256_hex_bytes;

use crate::input::read_bytes;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = read_bytes(input.as_deref())?;
    println!("{}", sha256_hex_bytes(&bytes)?);
    Ok(())
}
