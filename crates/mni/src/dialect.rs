//! MNI schema dialect detection.

use crate::resolver::{ATTRIBUTES, DADOS_BASICOS};
use serde_json::Value;
use std::fmt;

/// Consultation responses wrap the record as `{ "processo": { ... } }`.
const ENVELOPE: &str = "processo";

/// Schema version a raw record appears to follow.
///
/// Detection is a diagnostic only. Normalisation reads both dialects through the same field
/// tables and never branches on this value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MniDialect {
    /// MNI 2.2: scalar values in `attributes` bags.
    V2_2,
    /// MNI 3.0: flattened fields and a nested `dadosBasicos.dadosBasicos`.
    V3_0,
    Unknown,
}

impl MniDialect {
    pub fn detect(raw: &Value) -> Self {
        let root = unwrap_envelope(raw);
        let Some(basicos) = root
            .get(DADOS_BASICOS)
            .and_then(Value::as_object)
            .filter(|basicos| !basicos.is_empty())
        else {
            return MniDialect::Unknown;
        };

        if basicos.get(DADOS_BASICOS).is_some_and(Value::is_object) {
            MniDialect::V3_0
        } else if basicos.get(ATTRIBUTES).is_some_and(Value::is_object) {
            MniDialect::V2_2
        } else {
            MniDialect::V3_0
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MniDialect::V2_2 => "2.2",
            MniDialect::V3_0 => "3.0",
            MniDialect::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MniDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the record inside a `processo` envelope, or `raw` itself when there is none.
pub(crate) fn unwrap_envelope(raw: &Value) -> &Value {
    raw.get(ENVELOPE)
        .filter(|inner| inner.is_object())
        .unwrap_or(raw)
}
