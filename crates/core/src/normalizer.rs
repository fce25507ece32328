//! Full process normalisation: structure plus class and subject labels.

use crate::cache::LabelCache;
use crate::config::CoreConfig;
use crate::labels::{LabelKind, LabelLookup};
use crate::CoreResult;
use futures::future::join_all;
use mni::{MniError, ProcessRecord};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Normalises raw MNI records and resolves their labels through an injected [`LabelLookup`].
///
/// Each call works on its own input and returns an independent record. The only state shared
/// across calls is the optional [`LabelCache`].
pub struct ProcessNormalizer<L> {
    lookup: L,
    cache: Option<LabelCache>,
    lookup_timeout: Option<Duration>,
}

impl<L: LabelLookup> ProcessNormalizer<L> {
    /// Create a normaliser. A fresh cache is created when `config` enables caching.
    pub fn new(lookup: L, config: &CoreConfig) -> Self {
        let cache = config.cache_labels().then(LabelCache::new);
        Self {
            lookup,
            cache,
            lookup_timeout: config.lookup_timeout(),
        }
    }

    /// Create a normaliser that shares an existing cache, whatever `config` says about caching.
    pub fn with_cache(lookup: L, config: &CoreConfig, cache: LabelCache) -> Self {
        Self {
            lookup,
            cache: Some(cache),
            lookup_timeout: config.lookup_timeout(),
        }
    }

    pub fn cache(&self) -> Option<&LabelCache> {
        self.cache.as_ref()
    }

    /// Normalise a raw record of either dialect.
    ///
    /// The class lookup and one lookup per distinct subject code run concurrently. A lookup
    /// that fails, does not know the code or misses the deadline leaves the raw code as label.
    ///
    /// # Errors
    ///
    /// Only a non-object root fails, with [`crate::CoreError::Mni`].
    pub async fn normalize(&self, raw: &Value) -> CoreResult<ProcessRecord> {
        let mut record = mni::normalize_structure(raw)?;
        self.resolve_labels(&mut record).await;
        Ok(record)
    }

    /// Parse `input` as JSON and normalise it.
    pub async fn normalize_str(&self, input: &str) -> CoreResult<ProcessRecord> {
        let raw: Value = serde_json::from_str(input).map_err(MniError::from)?;
        self.normalize(&raw).await
    }

    async fn resolve_labels(&self, record: &mut ProcessRecord) {
        let classe_code = record
            .classe_processual
            .as_ref()
            .map(|classe| classe.codigo.clone());

        let mut subject_codes: Vec<String> = Vec::new();
        for assunto in &record.assuntos {
            let codigo = &assunto.codigo_nacional;
            if !codigo.is_empty() && !subject_codes.contains(codigo) {
                subject_codes.push(codigo.clone());
            }
        }

        let classe = async {
            match &classe_code {
                Some(code) => self.label(LabelKind::Classe, code).await,
                None => None,
            }
        };
        let assuntos = join_all(
            subject_codes
                .iter()
                .map(|code| self.label(LabelKind::Assunto, code)),
        );

        let (classe_label, assunto_labels) = tokio::join!(classe, assuntos);

        if let (Some(classe), Some(label)) = (record.classe_processual.as_mut(), classe_label) {
            classe.descricao = label;
        }

        let labels: HashMap<&str, String> = subject_codes
            .iter()
            .map(String::as_str)
            .zip(assunto_labels)
            .filter_map(|(code, label)| label.map(|label| (code, label)))
            .collect();

        for assunto in &mut record.assuntos {
            if let Some(label) = labels.get(assunto.codigo_nacional.as_str()) {
                assunto.descricao = label.clone();
            }
        }
    }

    /// Resolve one label, consulting the cache first. `None` means "keep the raw code".
    async fn label(&self, kind: LabelKind, code: &str) -> Option<String> {
        if let Some(hit) = self.cache.as_ref().and_then(|cache| cache.get(kind, code)) {
            tracing::debug!(%kind, code, "label cache hit");
            return Some(hit);
        }

        let lookup = self.lookup.lookup(kind, code);
        let outcome = match self.lookup_timeout {
            Some(deadline) => match tokio::time::timeout(deadline, lookup).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::warn!(
                        %kind,
                        code,
                        timeout_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
                        "label lookup timed out, using raw code"
                    );
                    return None;
                }
            },
            None => lookup.await,
        };

        match outcome {
            Ok(Some(label)) => {
                let label = label.trim();
                if label.is_empty() {
                    return None;
                }
                if let Some(cache) = &self.cache {
                    cache.insert(kind, code, label);
                }
                Some(label.to_string())
            }
            Ok(None) => {
                tracing::debug!(%kind, code, "no label for code");
                None
            }
            Err(err) => {
                tracing::warn!(%kind, code, error = %err, "label lookup failed, using raw code");
                None
            }
        }
    }
}
