//! Fallback chains for loosely-shaped JSON payloads.
//!
//! Deck services disagree on where a card's name or art lives. Each parser
//! declares an ordered list of JSON pointers and takes the first one that
//! resolves to a non-empty string. A chain never matches `false`, `0` or
//! empty strings, so a card literally named `"0"` is only found when the
//! service sends it as a string.

use serde_json::Value;

/// Ordered JSON pointers tried left to right.
pub type FieldChain = &'static [&'static str];

/// First non-empty string found along `chain`.
pub fn first_text<'a>(value: &'a Value, chain: FieldChain) -> Option<&'a str> {
    chain
        .iter()
        .filter_map(|pointer| value.pointer(pointer))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Like `first_text`, but owned and defaulting to `""`.
pub fn text_or_empty(value: &Value, chain: FieldChain) -> String {
    first_text(value, chain).unwrap_or_default().to_string()
}

/// First field along `chain` that is present and not null.
///
/// Mirrors `a ?? b ?? c`: a present-but-invalid value stops the search.
pub fn first_present<'a>(value: &'a Value, chain: FieldChain) -> Option<&'a Value> {
    chain
        .iter()
        .filter_map(|pointer| value.pointer(pointer))
        .find(|v| !v.is_null())
}

/// Read a quantity from a number or a numeric string.
///
/// Strings are parsed by their leading digits, so `"2x"` reads as 2.
/// Anything else is `None`.
pub fn as_quantity(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            let (sign, digits) = match s.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, s),
            };
            let end = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            digits[..end].parse::<i64>().ok().map(|n| sign * n)
        }
        _ => None,
    }
}

/// Lower-cased strings of an array field, skipping nulls.
pub fn lowercase_strings(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.to_lowercase()),
                    Value::Null => None,
                    other => Some(other.to_string().to_lowercase()),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Is the field a JSON `true` (or a truthy number/string)?
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        _ => false,
    }
}
