//! Mapping from [`Value`] to [`CanonicalValue`].
//!
//! The walk keeps its own heap stack of open containers, so input nesting
//! never consumes call-stack frames; `max_depth` bounds that stack.

use std::borrow::Cow;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::slice;
use std::vec;

use base64::Engine;
use chrono::{NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::canonical_value::CanonicalValue;
use crate::canonicalizer::CanonicalizationError;
use crate::hygiene::{HygieneReport, HygieneStatus};
use crate::options::{CanonicalOptions, DuplicateKeyPolicy, OpaquePolicy};
use crate::serializer::{format_float, serialize};
use crate::value::Value;

/// Location of a node, rendered as `root` or `a.b.[2]`.
///
/// Keys that would read as separators are quoted: `"a.b".[0]`.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn of(stack: &[Frame<'_>]) -> Self {
        Self {
            segments: stack.iter().filter_map(Frame::segment).collect(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key_segment(field));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

fn key_segment(key: &str) -> String {
    if key.is_empty() || key == "root" || key.contains(|c: char| matches!(c, '.' | '[' | '"')) {
        format!("{key:?}")
    } else {
        key.to_string()
    }
}

/// An open container whose children are being transformed.
enum Frame<'v> {
    Seq {
        items: slice::Iter<'v, Value>,
        out: Vec<CanonicalValue>,
    },
    Set {
        items: slice::Iter<'v, Value>,
        out: Vec<CanonicalValue>,
    },
    Map {
        entries: vec::IntoIter<(String, &'v Value)>,
        current: Option<String>,
        out: Vec<(String, CanonicalValue)>,
    },
}

impl<'v> Frame<'v> {
    fn next_child(&mut self) -> Option<&'v Value> {
        match self {
            Frame::Seq { items, .. } | Frame::Set { items, .. } => items.next(),
            Frame::Map {
                entries, current, ..
            } => entries.next().map(|(key, value)| {
                *current = Some(key);
                value
            }),
        }
    }

    fn accept(&mut self, value: CanonicalValue) {
        match self {
            Frame::Seq { out, .. } | Frame::Set { out, .. } => out.push(value),
            Frame::Map { current, out, .. } => {
                if let Some(key) = current.take() {
                    out.push((key, value));
                }
            }
        }
    }

    /// Path segment of the child currently being transformed.
    fn segment(&self) -> Option<String> {
        match self {
            Frame::Seq { out, .. } | Frame::Set { out, .. } => Some(format!("[{}]", out.len())),
            Frame::Map { current, .. } => current.as_deref().map(key_segment),
        }
    }
}

/// Transforms `value` under `options`, recording hygiene events in `report`.
pub fn transform(
    value: &Value,
    options: &CanonicalOptions,
    report: &mut HygieneReport,
) -> Result<CanonicalValue, CanonicalizationError> {
    Transform { options, report }.run(value)
}

struct Transform<'a> {
    options: &'a CanonicalOptions,
    report: &'a mut HygieneReport,
}

impl Transform<'_> {
    fn run(&mut self, root: &Value) -> Result<CanonicalValue, CanonicalizationError> {
        let mut stack: Vec<Frame<'_>> = Vec::new();
        let mut finished = self.open(root, &mut stack)?;

        while let Some(frame) = stack.last_mut() {
            if let Some(value) = finished.take() {
                frame.accept(value);
            }
            match frame.next_child() {
                Some(child) => finished = self.open(child, &mut stack)?,
                None => {
                    if let Some(frame) = stack.pop() {
                        finished = Some(self.close(frame, &stack)?);
                    }
                }
            }
        }

        finished.ok_or_else(|| CanonicalizationError::Other("traversal produced no value".into()))
    }

    /// Transforms a leaf directly, or pushes a frame for a container.
    fn open<'v>(
        &mut self,
        value: &'v Value,
        stack: &mut Vec<Frame<'v>>,
    ) -> Result<Option<CanonicalValue>, CanonicalizationError> {
        let leaf = match value {
            Value::Null => CanonicalValue::Null,
            Value::Bool(b) => CanonicalValue::Bool(*b),
            Value::Int(i) => CanonicalValue::Int(*i),
            Value::Float(f) => CanonicalValue::Float(*f),
            Value::Text(s) => CanonicalValue::Text(self.text(s).into_owned()),
            Value::Bytes(bytes) => CanonicalValue::bytes_marker(
                &self.options.bytes_marker,
                base64::engine::general_purpose::STANDARD.encode(bytes),
            ),
            Value::Date(date) => CanonicalValue::Text(format_date(date)),
            Value::DateTime(dt) => CanonicalValue::Text(self.naive_datetime(dt)),
            Value::ZonedDateTime(dt) => CanonicalValue::Text(
                dt.with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ),
            Value::Opaque { type_name, repr } => {
                CanonicalValue::Text(self.opaque(type_name, repr, stack)?)
            }
            Value::Seq(items) => {
                self.check_depth(stack)?;
                stack.push(Frame::Seq {
                    items: items.iter(),
                    out: Vec::with_capacity(items.len()),
                });
                return Ok(None);
            }
            Value::Set(items) => {
                self.check_depth(stack)?;
                stack.push(Frame::Set {
                    items: items.iter(),
                    out: Vec::with_capacity(items.len()),
                });
                return Ok(None);
            }
            Value::Map(entries) => {
                self.check_depth(stack)?;
                let entries = self.coerce_keys(entries, stack)?;
                stack.push(Frame::Map {
                    out: Vec::with_capacity(entries.len()),
                    entries: entries.into_iter(),
                    current: None,
                });
                return Ok(None);
            }
        };
        Ok(Some(leaf))
    }

    /// Finishes a container once all its children are transformed.
    fn close(
        &mut self,
        frame: Frame<'_>,
        parents: &[Frame<'_>],
    ) -> Result<CanonicalValue, CanonicalizationError> {
        match frame {
            Frame::Seq { out, .. } => Ok(CanonicalValue::Array(out)),
            Frame::Set { out, .. } => {
                let mut keyed = out
                    .into_iter()
                    .map(|item| -> Result<_, CanonicalizationError> {
                        Ok((serialize(&item)?, item))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                keyed.sort_by(|a, b| a.0.cmp(&b.0));
                keyed.dedup_by(|a, b| a.0 == b.0);
                Ok(CanonicalValue::SetArray(
                    keyed.into_iter().map(|(_, item)| item).collect(),
                ))
            }
            Frame::Map { out, .. } => {
                let mut map = BTreeMap::new();
                for (key, value) in out {
                    match map.entry(key) {
                        Entry::Vacant(slot) => {
                            slot.insert(value);
                        }
                        Entry::Occupied(mut slot) => {
                            // Only reachable under KeepLeast; Reject fails in coerce_keys.
                            let path = Path::of(parents).push_field(slot.key());
                            tracing::warn!(%path, "duplicate key after coercion, keeping least value");
                            self.report.record(
                                "DuplicateKeyTieBreak",
                                "duplicate_keys",
                                HygieneStatus::Lossy,
                            );
                            if serialize(&value)? < serialize(slot.get())? {
                                slot.insert(value);
                            }
                        }
                    }
                }
                Ok(CanonicalValue::Object(map))
            }
        }
    }

    fn check_depth(&self, stack: &[Frame<'_>]) -> Result<(), CanonicalizationError> {
        if stack.len() >= self.options.max_depth {
            return Err(CanonicalizationError::DepthLimitExceeded {
                path: Path::of(stack).to_string(),
                max: self.options.max_depth,
            });
        }
        Ok(())
    }

    /// Coerces keys to text, sorts entries, and enforces key policies.
    fn coerce_keys<'v>(
        &mut self,
        entries: &'v [(Value, Value)],
        stack: &[Frame<'v>],
    ) -> Result<Vec<(String, &'v Value)>, CanonicalizationError> {
        let mut coerced = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let key = self.coerce_key(key, stack)?;
            if key == self.options.bytes_marker {
                return Err(CanonicalizationError::ReservedKey {
                    path: Path::of(stack).to_string(),
                    key,
                });
            }
            coerced.push((key, value));
        }
        coerced.sort_by(|a, b| a.0.cmp(&b.0));

        if self.options.duplicate_keys == DuplicateKeyPolicy::Reject {
            if let Some(pair) = coerced.windows(2).find(|pair| pair[0].0 == pair[1].0) {
                return Err(CanonicalizationError::DuplicateKeyAfterCoercion {
                    path: Path::of(stack).to_string(),
                    key: pair[0].0.clone(),
                });
            }
        }
        Ok(coerced)
    }

    fn coerce_key(
        &mut self,
        key: &Value,
        stack: &[Frame<'_>],
    ) -> Result<String, CanonicalizationError> {
        Ok(match key {
            Value::Text(s) => self.text(s).into_owned(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_float(*f)?,
            Value::Bool(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::Date(date) => format_date(date),
            Value::DateTime(dt) => self.naive_datetime(dt),
            Value::ZonedDateTime(dt) => dt
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Value::Opaque { type_name, repr } => self.opaque(type_name, repr, stack)?,
            Value::Bytes(_) | Value::Map(_) | Value::Set(_) | Value::Seq(_) => {
                return Err(CanonicalizationError::UnsupportedKey {
                    path: Path::of(stack).to_string(),
                    kind: key.kind(),
                })
            }
        })
    }

    fn text<'s>(&mut self, s: &'s str) -> Cow<'s, str> {
        let normalized = normalize_newlines(s);
        if matches!(normalized, Cow::Owned(_)) {
            self.report.record(
                "NewlineNormalized",
                "newlines_normalized",
                HygieneStatus::Ok,
            );
        }
        normalized
    }

    fn naive_datetime(&mut self, dt: &NaiveDateTime) -> String {
        self.report.record(
            "UnzonedTimestamp",
            "unzoned_timestamps",
            HygieneStatus::Ambiguous,
        );
        dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }

    fn opaque(
        &mut self,
        type_name: &str,
        repr: &str,
        stack: &[Frame<'_>],
    ) -> Result<String, CanonicalizationError> {
        match self.options.opaque {
            OpaquePolicy::Reject => Err(CanonicalizationError::UnsupportedType {
                path: Path::of(stack).to_string(),
                type_name: type_name.to_string(),
            }),
            OpaquePolicy::Stringify => {
                tracing::warn!(path = %Path::of(stack), type_name, "stringifying opaque value");
                self.report
                    .record("OpaqueFallback", "opaque_fallbacks", HygieneStatus::Lossy);
                Ok(self.text(repr).into_owned())
            }
        }
    }
}

/// Rewrites `\r\n` and lone `\r` as `\n`. Borrows when nothing changes.
pub fn normalize_newlines(s: &str) -> Cow<'_, str> {
    if !s.contains('\r') {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.replace("\r\n", "\n").replace('\r', "\n"))
}

fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
