//! Input values accepted by the canonicalizer.
//!
//! [`Value`] is a closed set of kinds. Anything a caller cannot express with the
//! structural variants goes through [`Value::Opaque`], which carries the type
//! name and the value's default text representation.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// A structured value prior to canonicalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer. Wide enough for every `i64` and `u64`.
    Int(i128),
    /// IEEE-754 double. Never equal to an `Int` after canonicalization.
    Float(f64),
    /// Text string.
    Text(String),
    /// Raw bytes, encoded as a marker object.
    Bytes(Vec<u8>),
    /// Calendar date without time.
    Date(NaiveDate),
    /// Datetime without a timezone.
    DateTime(NaiveDateTime),
    /// Datetime with a UTC offset.
    ZonedDateTime(DateTime<FixedOffset>),
    /// Mapping with keys coerced to text during canonicalization.
    Map(Vec<(Value, Value)>),
    /// Unordered collection; construction order never reaches the output.
    Set(Vec<Value>),
    /// Ordered sequence.
    Seq(Vec<Value>),
    /// Value outside the recognized set.
    Opaque {
        /// Name of the host type, used in error messages.
        type_name: String,
        /// Default text representation of the value.
        repr: String,
    },
}

impl Value {
    /// Builds a mapping from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a set from elements.
    pub fn set<T: Into<Value>, I: IntoIterator<Item = T>>(items: I) -> Self {
        Value::Set(items.into_iter().map(Into::into).collect())
    }

    /// Builds an ordered sequence from elements.
    pub fn seq<T: Into<Value>, I: IntoIterator<Item = T>>(items: I) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Wraps a byte slice.
    pub fn bytes(bytes: impl AsRef<[u8]>) -> Self {
        Value::Bytes(bytes.as_ref().to_vec())
    }

    /// Wraps any `Display` value as opaque, recording its type name.
    pub fn opaque<T: std::fmt::Display + ?Sized>(value: &T) -> Self {
        Value::Opaque {
            type_name: std::any::type_name::<T>().to_string(),
            repr: value.to_string(),
        }
    }

    /// Short name of this value's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::ZonedDateTime(_) => "zoned-datetime",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::Seq(_) => "seq",
            Value::Opaque { .. } => "opaque",
        }
    }
}

impl Drop for Value {
    // Children are detached onto a heap stack; drop depth stays constant.
    fn drop(&mut self) {
        let mut pending = match self {
            Value::Seq(items) | Value::Set(items) if !items.is_empty() => std::mem::take(items),
            Value::Map(entries) if !entries.is_empty() => flatten(std::mem::take(entries)),
            _ => return,
        };
        while let Some(mut value) = pending.pop() {
            match &mut value {
                Value::Seq(items) | Value::Set(items) => pending.append(items),
                Value::Map(entries) => pending.extend(flatten(std::mem::take(entries))),
                _ => {}
            }
        }
    }
}

fn flatten(entries: Vec<(Value, Value)>) -> Vec<Value> {
    entries.into_iter().flat_map(|(k, v)| [k, v]).collect()
}

macro_rules! from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(value as i128)
                }
            }
        )*
    };
}

from_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(value: DateTime<Tz>) -> Self {
        Value::ZonedDateTime(value.fixed_offset())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::seq(value)
    }
}

impl<K: Into<Value>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(value: BTreeMap<K, V>) -> Self {
        Value::map(value)
    }
}

impl<K: Into<Value>, V: Into<Value>, S> From<HashMap<K, V, S>> for Value {
    fn from(value: HashMap<K, V, S>) -> Self {
        Value::map(value)
    }
}

impl<T: Into<Value>> From<BTreeSet<T>> for Value {
    fn from(value: BTreeSet<T>) -> Self {
        Value::set(value)
    }
}

impl<T: Into<Value>, S> From<HashSet<T, S>> for Value {
    fn from(value: HashSet<T, S>) -> Self {
        Value::set(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i128::from(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Int(i128::from(u))
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => Value::seq(items),
            serde_json::Value::Object(map) => Value::map(map),
        }
    }
}
