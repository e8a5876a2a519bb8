use std::collections::BTreeMap;

/// A value with every ordering decision already made.
///
/// Structurally equal trees always serialize to the same text.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalValue {
    /// `null`.
    Null,
    /// `true` / `false`.
    Bool(bool),
    /// Integer, rendered without a decimal point.
    Int(i128),
    /// Float, rendered with a decimal point or exponent, or as `NaN`,
    /// `Infinity` or `-Infinity`.
    Float(f64),
    /// Newline-normalized text.
    Text(String),
    /// Sequence in source order.
    Array(Vec<CanonicalValue>),
    /// Former set, ordered by each element's canonical text.
    SetArray(Vec<CanonicalValue>),
    /// Mapping ordered by key bytes.
    Object(BTreeMap<String, CanonicalValue>),
}

impl CanonicalValue {
    /// The single-entry object standing in for a byte blob.
    pub fn bytes_marker(marker: &str, b64: String) -> Self {
        let mut map = BTreeMap::new();
        map.insert(marker.to_string(), CanonicalValue::Text(b64));
        CanonicalValue::Object(map)
    }
}

impl Drop for CanonicalValue {
    // Children are detached onto a heap stack; drop depth stays constant.
    fn drop(&mut self) {
        let mut pending = match self {
            CanonicalValue::Array(items) | CanonicalValue::SetArray(items)
                if !items.is_empty() =>
            {
                std::mem::take(items)
            }
            CanonicalValue::Object(map) if !map.is_empty() => {
                std::mem::take(map).into_values().collect()
            }
            _ => return,
        };
        while let Some(mut value) = pending.pop() {
            match &mut value {
                CanonicalValue::Array(items) | CanonicalValue::SetArray(items) => {
                    pending.append(items);
                }
                CanonicalValue::Object(map) => pending.extend(std::mem::take(map).into_values()),
                _ => {}
            }
        }
    }
}
