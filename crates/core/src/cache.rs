//! Process-wide memo of resolved labels.
//!
//! The cache is an explicit object handed to the normaliser rather than ambient state. Clones
//! share the same entries, so one cache can serve many normalisers and be invalidated from
//! outside when reference tables change.

use crate::labels::LabelKind;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

type Tables = HashMap<LabelKind, HashMap<String, String>>;

#[derive(Clone, Debug, Default)]
pub struct LabelCache {
    entries: Arc<RwLock<Tables>>,
}

impl LabelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: LabelKind, code: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&kind).and_then(|table| table.get(code)).cloned()
    }

    pub fn insert(&self, kind: LabelKind, code: impl Into<String>, label: impl Into<String>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(kind)
            .or_default()
            .insert(code.into(), label.into());
    }

    /// Drop every cached label of `kind`.
    pub fn invalidate(&self, kind: LabelKind) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(&kind);
    }

    /// Drop every cached label.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
