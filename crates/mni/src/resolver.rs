//! Dialect-agnostic field access over raw MNI records.
//!
//! MNI 2.2 payloads carry scalar values inside an `attributes` bag, while MNI 3.0 payloads
//! flatten them onto the node or nest them under bags such as `dadosBasicos` or `conteudo`.
//! Every lookup in the extractors goes through this module so the per-dialect placement of a
//! logical field is written down once, as an ordered table of [`FieldPath`]s.
//!
//! All functions here are total: missing bags, `null` values and non-object nodes simply
//! resolve to nothing.

use serde_json::Value;

/// Attribute bag used by MNI 2.2 payloads.
pub const ATTRIBUTES: &str = "attributes";

/// Nested basic-data bag used by MNI 3.0 payloads.
pub const DADOS_BASICOS: &str = "dadosBasicos";

/// Location of a logical field: either directly on the node or inside a named bag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldPath {
    pub bag: Option<&'static str>,
    pub key: &'static str,
}

impl FieldPath {
    /// A field stored directly on the node.
    pub const fn own(key: &'static str) -> Self {
        Self { bag: None, key }
    }

    /// A field stored inside the `bag` child of the node.
    pub const fn in_bag(bag: &'static str, key: &'static str) -> Self {
        Self {
            bag: Some(bag),
            key,
        }
    }

    /// Returns the value at this path when it is present.
    pub fn lookup<'a>(&self, node: &'a Value) -> Option<&'a Value> {
        let holder = match self.bag {
            Some(bag) => node.get(bag)?,
            None => node,
        };
        holder.get(self.key).filter(|value| is_present(value))
    }
}

/// Returns `true` when a value carries information: not `null`, not a blank string and not an
/// empty array.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// Returns the first present value among `paths`, in priority order.
pub fn resolve_paths<'a>(node: &'a Value, paths: &[FieldPath]) -> Option<&'a Value> {
    paths.iter().find_map(|path| path.lookup(node))
}

/// Returns the first present value among `keys`, checking the node's own field before its
/// `attributes` bag for each key.
pub fn resolve<'a>(node: &'a Value, keys: &[&'static str]) -> Option<&'a Value> {
    keys.iter().find_map(|&key| {
        FieldPath::own(key)
            .lookup(node)
            .or_else(|| FieldPath::in_bag(ATTRIBUTES, key).lookup(node))
    })
}

/// [`resolve`] followed by [`text_of`].
pub fn resolve_text(node: &Value, keys: &[&'static str]) -> Option<String> {
    resolve(node, keys).and_then(text_of)
}

/// [`resolve_paths`] followed by [`text_of`].
pub fn resolve_paths_text(node: &Value, paths: &[FieldPath]) -> Option<String> {
    resolve_paths(node, paths).and_then(text_of)
}

/// Normalises scalar-or-array cardinality.
///
/// A missing value becomes an empty list, a single node becomes a singleton and an array is
/// returned element by element with `null` entries dropped.
pub fn as_list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter(|item| !item.is_null()).collect(),
        Some(other) => vec![other],
    }
}

/// Renders a scalar as trimmed text.
///
/// Numbers and booleans are stringified; a single-element array yields its first element.
/// Objects and blank strings yield `None`.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => items.first().and_then(text_of),
        Value::Object(_) | Value::Null => None,
    }
}

/// Parses a non-negative integer, defaulting to `0` on missing or malformed input.
///
/// Fractional values are truncated and negative values clamp to `0`.
pub fn parse_u64_or_zero(value: Option<&Value>) -> u64 {
    fn from_float(f: f64) -> u64 {
        if f.is_finite() && f > 0.0 {
            f.trunc() as u64
        } else {
            0
        }
    }

    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or_else(|| n.as_f64().map_or(0, from_float)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(from_float))
                .unwrap_or(0)
        }
        Some(Value::Array(items)) => parse_u64_or_zero(items.first()),
        _ => 0,
    }
}

/// [`parse_u64_or_zero`] saturated into a `u32`.
pub fn parse_u32_or_zero(value: Option<&Value>) -> u32 {
    u32::try_from(parse_u64_or_zero(value)).unwrap_or(u32::MAX)
}

/// Parses a decimal amount, defaulting to `0.0` on missing or malformed input.
///
/// Accepts both `1234.56` and the Brazilian `1.234,56` notation.
pub fn parse_decimal_or_zero(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.contains(',') {
                s.replace('.', "").replace(',', ".").parse::<f64>().ok()
            } else {
                s.parse::<f64>().ok()
            }
        }
        Some(Value::Array(items)) => Some(parse_decimal_or_zero(items.first())),
        _ => None,
    };

    parsed.filter(|f| f.is_finite()).unwrap_or(0.0)
}

/// Canonical boolean flag rule: JSON `true`, or the text `"true"` / `"s"` in any case.
pub fn parse_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("s")
        }
        _ => false,
    }
}
