use chrono::{TimeZone, Utc};
use keycommit_canonical::{Canonicalizer, Value};

fn main() {
    let canonicalizer = Canonicalizer::default();
    let record = Value::map([
        ("title", Value::from("Quarterly update\r\nDraft")),
        ("tags", Value::set(["finance", "draft", "q3"])),
        ("attachment", Value::bytes(b"\x00\x01\x02")),
        (
            "created_at",
            Value::from(Utc.with_ymd_and_hms(2025, 12, 20, 0, 0, 0).unwrap()),
        ),
        ("score", Value::Float(0.75)),
    ]);

    match (
        canonicalizer.canonicalize(&record),
        canonicalizer.fingerprint(&record),
    ) {
        (Ok(text), Ok(key)) => {
            println!("{text}");
            println!("{key}");
        }
        (Err(err), _) | (_, Err(err)) => {
            eprintln!("canonicalization failed: {}", err);
            std::process::exit(1);
        }
    }
}
