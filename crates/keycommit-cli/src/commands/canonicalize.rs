//! Canonicalize command implementation.

use keycommit_canonical::{CanonicalOptions, Canonicalizer};

use crate::input::read_json_value;
use crate::output::format_report;

pub fn run(
    input: Option<String>,
    report: bool,
    options: CanonicalOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let canonicalizer = Canonicalizer::new(options)?;
    let value = read_json_value(input.as_deref())?;

    match canonicalizer.canonicalize_with_report(&value) {
        Ok(result) => {
            if report {
                eprintln!("{}", format_report(&result.report));
            }
            println!("{}", result.text);
            Ok(())
        }
        Err((err, hygiene)) => {
            if report {
                eprintln!("{}", format_report(&hygiene));
            }
            Err(format!("Canonicalization failed: {}", err).into())
        }
    }
}
