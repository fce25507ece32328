//! Code → label lookup collaborators.
//!
//! The normaliser resolves procedural class and subject codes through a [`LabelLookup`]. The
//! production collaborator is usually a remote reference-table service; [`StaticLabels`] serves
//! tables already on disk and doubles as a deterministic fake in tests.

use crate::{CoreError, CoreResult, LookupError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Which reference table a code belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelKind {
    /// Procedural class (`classeProcessual`).
    Classe,
    /// Subject (`assunto`).
    Assunto,
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelKind::Classe => f.write_str("classe"),
            LabelKind::Assunto => f.write_str("assunto"),
        }
    }
}

pub type LookupResult = Result<Option<String>, LookupError>;

/// Asynchronous code → label lookup.
///
/// `Ok(None)` means the collaborator answered but does not know the code.
#[async_trait]
pub trait LabelLookup: Send + Sync {
    async fn lookup(&self, kind: LabelKind, code: &str) -> LookupResult;
}

#[async_trait]
impl<T: LabelLookup + ?Sized> LabelLookup for Arc<T> {
    async fn lookup(&self, kind: LabelKind, code: &str) -> LookupResult {
        (**self).lookup(kind, code).await
    }
}

#[async_trait]
impl<T: LabelLookup + ?Sized> LabelLookup for Box<T> {
    async fn lookup(&self, kind: LabelKind, code: &str) -> LookupResult {
        (**self).lookup(kind, code).await
    }
}

/// A lookup that knows no labels. Every code keeps its raw value.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLabels;

#[async_trait]
impl LabelLookup for NoLabels {
    async fn lookup(&self, _kind: LabelKind, _code: &str) -> LookupResult {
        Ok(None)
    }
}

/// In-memory reference tables.
#[derive(Clone, Debug, Default)]
pub struct StaticLabels {
    tables: HashMap<LabelKind, HashMap<String, String>>,
}

impl StaticLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the table for `kind`.
    pub fn with_table(mut self, kind: LabelKind, table: HashMap<String, String>) -> Self {
        self.tables.insert(kind, table);
        self
    }

    pub fn insert(&mut self, kind: LabelKind, code: impl Into<String>, label: impl Into<String>) {
        self.tables
            .entry(kind)
            .or_default()
            .insert(code.into(), label.into());
    }

    pub fn get(&self, kind: LabelKind, code: &str) -> Option<&str> {
        self.tables
            .get(&kind)
            .and_then(|table| table.get(code.trim()))
            .map(String::as_str)
    }

    pub fn len(&self, kind: LabelKind) -> usize {
        self.tables.get(&kind).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(HashMap::is_empty)
    }

    /// Load the table for `kind` from a file. See [`parse_label_table`] for accepted shapes.
    pub fn load_table(mut self, kind: LabelKind, path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path).map_err(CoreError::FileRead)?;
        let table = parse_label_table(&text)?;
        tracing::debug!(%kind, path = %path.display(), entries = table.len(), "loaded label table");
        self.tables.insert(kind, table);
        Ok(self)
    }
}

#[async_trait]
impl LabelLookup for StaticLabels {
    async fn lookup(&self, kind: LabelKind, code: &str) -> LookupResult {
        Ok(self.get(kind, code).map(str::to_string))
    }
}

/// A code as it appears in reference tables: text, or a bare number in YAML/JSON.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(untagged)]
enum CodeWire {
    Text(String),
    Number(i64),
}

impl CodeWire {
    fn into_code(self) -> String {
        match self {
            CodeWire::Text(text) => text.trim().to_string(),
            CodeWire::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LabelEntryWire {
    codigo: CodeWire,
    descricao: String,
}

/// Parse a code → label table from JSON or YAML text.
///
/// Two shapes are accepted:
/// - a mapping `{ "7": "Procedimento Comum" }`
/// - a list of entries `[{ "codigo": 7, "descricao": "Procedimento Comum" }]`, as produced
///   by flattening the gateway's reference tables. Extra fields on entries are ignored.
///
/// Entries with a blank code or label are skipped.
///
/// # Errors
///
/// Returns [`CoreError::Translation`] with the path of the offending field when the text does
/// not match either shape.
pub fn parse_label_table(text: &str) -> CoreResult<HashMap<String, String>> {
    let value: serde_yaml::Value = serde_yaml::from_str(text)
        .map_err(|e| CoreError::Translation(format!("label table is not valid JSON/YAML: {e}")))?;

    let entries: Vec<(String, String)> = match value {
        serde_yaml::Value::Null => Vec::new(),
        serde_yaml::Value::Sequence(_) => from_wire::<Vec<LabelEntryWire>>(value)?
            .into_iter()
            .map(|entry| (entry.codigo.into_code(), entry.descricao))
            .collect(),
        serde_yaml::Value::Mapping(_) => from_wire::<BTreeMap<CodeWire, String>>(value)?
            .into_iter()
            .map(|(code, label)| (code.into_code(), label))
            .collect(),
        _ => {
            return Err(CoreError::Translation(
                "label table must be a mapping or a list of entries".into(),
            ))
        }
    };

    Ok(entries
        .into_iter()
        .map(|(code, label)| (code, label.trim().to_string()))
        .filter(|(code, label)| !code.is_empty() && !label.is_empty())
        .collect())
}

/// Deserialize `value`, surfacing a best-effort path (e.g. `[3].descricao`) on mismatch.
fn from_wire<T: DeserializeOwned>(value: serde_yaml::Value) -> CoreResult<T> {
    match serde_path_to_error::deserialize::<_, T>(value) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() || path == "." {
                "<root>"
            } else {
                path.as_str()
            };
            Err(CoreError::Translation(format!(
                "label table schema mismatch at {path}: {source}"
            )))
        }
    }
}
