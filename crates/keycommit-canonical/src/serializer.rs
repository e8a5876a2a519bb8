//! Compact text rendering of [`CanonicalValue`] trees.
//!
//! The output is JSON-shaped with no whitespace. Strings use JSON escaping and
//! leave non-ASCII characters as raw UTF-8. Floats use the shortest
//! round-trip form and always carry a decimal point or exponent, so `1` and
//! `1.0` stay distinct. NaN and the infinities are written as the bare tokens
//! `NaN`, `Infinity` and `-Infinity`. Rendering walks an explicit work list rather than
//! recursing.

use std::io::Write;

use crate::canonical_value::CanonicalValue;
use crate::canonicalizer::CanonicalizationError;

enum Emit<'a> {
    Value(&'a CanonicalValue),
    Key(&'a str),
    Punct(u8),
}

/// Renders a canonical tree to text.
pub fn serialize(value: &CanonicalValue) -> Result<String, CanonicalizationError> {
    let mut out: Vec<u8> = Vec::new();
    let mut work = vec![Emit::Value(value)];

    while let Some(item) = work.pop() {
        match item {
            Emit::Punct(byte) => out.push(byte),
            Emit::Key(key) => {
                write_str(&mut out, key)?;
                out.push(b':');
            }
            Emit::Value(value) => match value {
                CanonicalValue::Null => out.extend_from_slice(b"null"),
                CanonicalValue::Bool(true) => out.extend_from_slice(b"true"),
                CanonicalValue::Bool(false) => out.extend_from_slice(b"false"),
                CanonicalValue::Int(i) => write!(out, "{i}").map_err(other)?,
                CanonicalValue::Float(f) => write_float(&mut out, *f)?,
                CanonicalValue::Text(s) => write_str(&mut out, s)?,
                CanonicalValue::Array(items) | CanonicalValue::SetArray(items) => {
                    out.push(b'[');
                    work.push(Emit::Punct(b']'));
                    for (idx, item) in items.iter().enumerate().rev() {
                        work.push(Emit::Value(item));
                        if idx > 0 {
                            work.push(Emit::Punct(b','));
                        }
                    }
                }
                CanonicalValue::Object(map) => {
                    out.push(b'{');
                    work.push(Emit::Punct(b'}'));
                    for (idx, (key, item)) in map.iter().enumerate().rev() {
                        work.push(Emit::Value(item));
                        work.push(Emit::Key(key));
                        if idx > 0 {
                            work.push(Emit::Punct(b','));
                        }
                    }
                }
            },
        }
    }

    String::from_utf8(out).map_err(other)
}

/// Renders a float the way [`serialize`] does.
pub fn format_float(value: f64) -> Result<String, CanonicalizationError> {
    let mut out = Vec::new();
    write_float(&mut out, value)?;
    String::from_utf8(out).map_err(other)
}

fn write_float(out: &mut Vec<u8>, value: f64) -> Result<(), CanonicalizationError> {
    if !value.is_finite() {
        let token: &[u8] = if value.is_nan() {
            b"NaN"
        } else if value > 0.0 {
            b"Infinity"
        } else {
            b"-Infinity"
        };
        out.extend_from_slice(token);
        return Ok(());
    }
    serde_json::to_writer(out, &value).map_err(other)
}

fn write_str(out: &mut Vec<u8>, value: &str) -> Result<(), CanonicalizationError> {
    serde_json::to_writer(out, value).map_err(other)
}

fn other(err: impl std::fmt::Display) -> CanonicalizationError {
    CanonicalizationError::Other(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn object(entries: &[(&str, CanonicalValue)]) -> CanonicalValue {
        CanonicalValue::Object(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn emits_no_whitespace() {
        let value = object(&[
            ("b", CanonicalValue::Int(2)),
            ("a", CanonicalValue::Array(vec![CanonicalValue::Null, CanonicalValue::Bool(true)])),
        ]);
        assert_eq!(serialize(&value).unwrap(), r#"{"a":[null,true],"b":2}"#);
    }

    #[test]
    fn int_and_float_render_differently() {
        assert_eq!(serialize(&CanonicalValue::Int(1)).unwrap(), "1");
        assert_eq!(serialize(&CanonicalValue::Float(1.0)).unwrap(), "1.0");
        assert_eq!(serialize(&CanonicalValue::Float(1.23)).unwrap(), "1.23");
        assert_eq!(serialize(&CanonicalValue::Float(-0.0)).unwrap(), "-0.0");
    }

    #[test]
    fn large_floats_use_exponent() {
        let text = format_float(1e300).unwrap();
        assert!(text.contains('e'), "{text}");
    }

    #[test]
    fn non_ascii_is_raw_and_controls_are_escaped() {
        let value = CanonicalValue::Text("héllo \u{1F600}\n\"q\"\u{1}".into());
        assert_eq!(
            serialize(&value).unwrap(),
            "\"héllo \u{1F600}\\n\\\"q\\\"\\u0001\""
        );
    }

    #[test]
    fn non_finite_floats_are_bare_tokens() {
        assert_eq!(serialize(&CanonicalValue::Float(f64::NAN)).unwrap(), "NaN");
        assert_eq!(serialize(&CanonicalValue::Float(-f64::NAN)).unwrap(), "NaN");
        assert_eq!(format_float(f64::INFINITY).unwrap(), "Infinity");
        assert_eq!(format_float(f64::NEG_INFINITY).unwrap(), "-Infinity");
        assert_ne!(
            serialize(&CanonicalValue::Float(f64::NAN)).unwrap(),
            serialize(&CanonicalValue::Text("NaN".into())).unwrap()
        );
    }

    #[test]
    fn empty_containers() {
        assert_eq!(serialize(&CanonicalValue::Array(vec![])).unwrap(), "[]");
        assert_eq!(serialize(&CanonicalValue::SetArray(vec![])).unwrap(), "[]");
        assert_eq!(serialize(&object(&[])).unwrap(), "{}");
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        let mut value = CanonicalValue::Int(0);
        for _ in 0..10_000 {
            value = CanonicalValue::Array(vec![value]);
        }
        let text = serialize(&value).unwrap();
        assert_eq!(text.len(), 20_001);
    }
}
