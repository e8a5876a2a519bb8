use std::collections::{BTreeSet, HashMap, HashSet};

use base64::Engine;
use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use keycommit_canonical::{
    canonicalize, fingerprint, sha256_hex, CanonicalOptions, CanonicalizationError,
    Canonicalizer, DuplicateKeyPolicy, HygieneStatus, OpaquePolicy, Value, DEFAULT_BYTES_MARKER,
};
use serde_json::json;

fn nested_fixture() -> Value {
    Value::map([
        ("s", Value::from("line1\r\nline2")),
        ("n", Value::Float(1.23)),
        ("b", Value::Bool(true)),
        ("none", Value::Null),
        ("list", Value::seq([Value::Int(3), Value::map([("x", 1), ("y", 2)])])),
        ("tuple", Value::seq([1, 2, 3])),
        ("set", Value::set(["b", "a"])),
        ("bytes", Value::bytes([0x00, 0x01])),
        (
            "dt",
            Value::from(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()),
        ),
    ])
}

#[test]
fn flat_mapping_is_compact_and_sorted() {
    let value = Value::map([("b", 2), ("a", 1)]);
    assert_eq!(canonicalize(&value).unwrap(), r#"{"a":1,"b":2}"#);
}

#[test]
fn nested_fixture_matches_golden_text() {
    let text = canonicalize(&nested_fixture()).unwrap();
    assert_eq!(
        text,
        concat!(
            r#"{"b":true,"bytes":{"__bytes__":"AAE="},"dt":"2025-01-02T03:04:05Z","#,
            r#""list":[3,{"x":1,"y":2}],"n":1.23,"none":null,"s":"line1\nline2","#,
            r#""set":["a","b"],"tuple":[1,2,3]}"#
        )
    );
    assert!(text.contains(",\"n\":1.23"));
    assert!(text.contains(",{"));
    assert!(text.contains("\"set\":[\"a\",\"b\"]"));
    assert!(!text.contains('\r'));
}

#[test]
fn mapping_insertion_order_is_irrelevant() {
    let x = Value::from(json!({"z": [1, 2, {"a": 3}], "a": {"b": 1, "c": 2}}));
    let y = Value::map([
        ("a", Value::map([("c", 2), ("b", 1)])),
        ("z", Value::from(json!([1, 2, {"a": 3}]))),
    ]);
    assert_eq!(canonicalize(&x).unwrap(), canonicalize(&y).unwrap());

    let mut forward = HashMap::new();
    let mut backward = HashMap::new();
    for i in 0..64 {
        forward.insert(format!("k{i}"), i);
    }
    for i in (0..64).rev() {
        backward.insert(format!("k{i}"), i);
    }
    assert_eq!(
        canonicalize(&Value::from(forward)).unwrap(),
        canonicalize(&Value::from(backward)).unwrap()
    );
}

#[test]
fn set_construction_order_is_irrelevant() {
    let a = Value::set([Value::Int(3), Value::from("x"), Value::map([("k", 1)])]);
    let b = Value::set([Value::map([("k", 1)]), Value::Int(3), Value::from("x")]);
    assert_eq!(canonicalize(&a).unwrap(), canonicalize(&b).unwrap());

    let hashed: HashSet<&str> = ["pear", "apple", "fig"].into_iter().collect();
    let ordered: BTreeSet<&str> = ["fig", "pear", "apple"].into_iter().collect();
    assert_eq!(
        canonicalize(&Value::from(hashed)).unwrap(),
        canonicalize(&Value::from(ordered)).unwrap()
    );
}

#[test]
fn line_endings_are_normalized() {
    let lf = canonicalize(&Value::from("a\nb")).unwrap();
    assert_eq!(canonicalize(&Value::from("a\r\nb")).unwrap(), lf);
    assert_eq!(canonicalize(&Value::from("a\rb")).unwrap(), lf);
    assert_ne!(canonicalize(&Value::from(" a\nb")).unwrap(), lf);
}

#[test]
fn int_and_float_do_not_collide() {
    assert_ne!(
        canonicalize(&Value::Int(1)).unwrap(),
        canonicalize(&Value::Float(1.0)).unwrap()
    );
    assert_ne!(
        fingerprint(&Value::Int(1)).unwrap(),
        fingerprint(&Value::Float(1.0)).unwrap()
    );
}

#[test]
fn non_finite_floats_use_fixed_tokens() {
    let value = Value::map([
        ("nan", f64::NAN),
        ("inf", f64::INFINITY),
        ("ninf", f64::NEG_INFINITY),
    ]);
    assert_eq!(
        canonicalize(&value).unwrap(),
        r#"{"inf":Infinity,"nan":NaN,"ninf":-Infinity}"#
    );

    for (float, token) in [
        (f64::NAN, "NaN"),
        (f64::INFINITY, "Infinity"),
        (f64::NEG_INFINITY, "-Infinity"),
    ] {
        assert_eq!(canonicalize(&Value::Float(float)).unwrap(), token);
        assert_eq!(
            canonicalize(&Value::from(token)).unwrap(),
            format!("\"{token}\"")
        );
        assert_ne!(
            fingerprint(&Value::Float(float)).unwrap(),
            fingerprint(&Value::from(token)).unwrap()
        );
    }

    let keyed = Value::map([(Value::Float(f64::NEG_INFINITY), 1)]);
    assert_eq!(canonicalize(&keyed).unwrap(), r#"{"-Infinity":1}"#);
}

#[test]
fn bytes_round_trip_through_marker() {
    let value = Value::map([("bytes", Value::bytes([0x00, 0x01]))]);
    let text = canonicalize(&value).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    let b64 = parsed["bytes"][DEFAULT_BYTES_MARKER].as_str().unwrap();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(b64)
        .unwrap();
    assert_eq!(decoded, vec![0x00, 0x01]);
}

#[test]
fn marker_key_in_application_data_is_rejected() {
    let value = Value::map([("payload", Value::map([(DEFAULT_BYTES_MARKER, "AAE=")]))]);
    match canonicalize(&value).unwrap_err() {
        CanonicalizationError::ReservedKey { path, key } => {
            assert_eq!(path, "payload");
            assert_eq!(key, DEFAULT_BYTES_MARKER);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn custom_marker_is_honoured() {
    let canonicalizer = Canonicalizer::new(CanonicalOptions {
        bytes_marker: "$bin".into(),
        ..CanonicalOptions::default()
    })
    .unwrap();
    let text = canonicalizer.canonicalize(&Value::bytes(b"hi")).unwrap();
    assert_eq!(text, r#"{"$bin":"aGk="}"#);
    // The default marker is an ordinary key under a custom one.
    assert!(canonicalizer
        .canonicalize(&Value::map([(DEFAULT_BYTES_MARKER, 1)]))
        .is_ok());
}

#[test]
fn same_instant_in_different_zones_matches() {
    let tokyo = FixedOffset::east_opt(9 * 3600)
        .unwrap()
        .with_ymd_and_hms(2025, 1, 2, 12, 4, 5)
        .unwrap();
    let new_york = FixedOffset::west_opt(5 * 3600)
        .unwrap()
        .with_ymd_and_hms(2025, 1, 1, 22, 4, 5)
        .unwrap();
    assert_eq!(
        canonicalize(&Value::from(tokyo)).unwrap(),
        canonicalize(&Value::from(new_york)).unwrap()
    );
}

#[test]
fn unzoned_datetime_is_not_shifted() {
    let naive = NaiveDate::from_ymd_opt(2025, 1, 2)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let result = Canonicalizer::default()
        .canonicalize_with_report(&Value::from(naive))
        .unwrap();
    assert_eq!(result.text, r#""2025-01-02T12:00:00""#);
    assert_eq!(result.report.status, HygieneStatus::Ambiguous);
}

#[test]
fn duplicate_coerced_keys_fail_by_default() {
    let value = Value::map([(Value::Int(1), "int"), (Value::from("1"), "text")]);
    match canonicalize(&value).unwrap_err() {
        CanonicalizationError::DuplicateKeyAfterCoercion { path, key } => {
            assert_eq!(path, "root");
            assert_eq!(key, "1");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn keep_least_tie_break_ignores_insertion_order() {
    let canonicalizer = Canonicalizer::new(CanonicalOptions {
        duplicate_keys: DuplicateKeyPolicy::KeepLeast,
        ..CanonicalOptions::default()
    })
    .unwrap();
    let a = Value::map([(Value::Int(1), "zeta"), (Value::from("1"), "alpha")]);
    let b = Value::map([(Value::from("1"), "alpha"), (Value::Int(1), "zeta")]);

    let result = canonicalizer.canonicalize_with_report(&a).unwrap();
    assert_eq!(result.text, r#"{"1":"alpha"}"#);
    assert_eq!(result.report.status, HygieneStatus::Lossy);
    assert_eq!(canonicalizer.canonicalize(&b).unwrap(), result.text);
}

#[test]
fn opaque_values_are_policy_controlled() {
    let value = Value::map([("addr", Value::opaque(&std::net::Ipv4Addr::LOCALHOST))]);
    assert!(matches!(
        canonicalize(&value),
        Err(CanonicalizationError::UnsupportedType { .. })
    ));

    let lenient = Canonicalizer::new(CanonicalOptions {
        opaque: OpaquePolicy::Stringify,
        ..CanonicalOptions::default()
    })
    .unwrap();
    assert_eq!(
        lenient.canonicalize(&value).unwrap(),
        r#"{"addr":"127.0.0.1"}"#
    );
}

#[test]
fn adversarial_nesting_fails_cleanly() {
    let mut value = Value::Int(0);
    for _ in 0..100_000 {
        value = Value::Seq(vec![value]);
    }
    assert!(matches!(
        canonicalize(&value),
        Err(CanonicalizationError::DepthLimitExceeded { max: 128, .. })
    ));

    let unbounded = Canonicalizer::new(CanonicalOptions {
        max_depth: usize::MAX,
        ..CanonicalOptions::default()
    })
    .unwrap();
    let text = unbounded.canonicalize(&value).unwrap();
    assert_eq!(text.len(), 200_001);
    drop(value);
}

#[test]
fn fingerprint_is_hash_of_canonical_text() {
    let value = nested_fixture();
    let key = fingerprint(&value).unwrap();
    assert_eq!(key.as_str().len(), 64);
    assert_eq!(key.as_str(), sha256_hex(&canonicalize(&value).unwrap()));
    assert_eq!(fingerprint(&nested_fixture()).unwrap(), key);
}

#[test]
fn fingerprint_is_stable_across_runs() {
    // Pinned so any change to the canonical form is caught.
    let value = Value::map([("b", 2), ("a", 1)]);
    assert_eq!(
        fingerprint(&value).unwrap().as_str(),
        sha256_hex(r#"{"a":1,"b":2}"#)
    );
    assert_eq!(
        fingerprint(&Value::from("")).unwrap().as_str(),
        sha256_hex("\"\"")
    );
}

#[test]
fn concurrent_callers_agree() {
    let canonicalizer = Canonicalizer::default();
    let expected = canonicalizer.canonicalize(&nested_fixture()).unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| canonicalizer.canonicalize(&nested_fixture()).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
