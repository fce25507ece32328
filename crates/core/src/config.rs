//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the normaliser. The
//! normaliser never reads environment variables itself, so tests and concurrent callers see the
//! behaviour they configured.

use crate::constants::{DEFAULT_LOOKUP_TIMEOUT_MS, LABEL_CACHE_ENV, LOOKUP_TIMEOUT_ENV};
use crate::{CoreError, CoreResult};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    lookup_timeout: Option<Duration>,
    cache_labels: bool,
}

impl CoreConfig {
    /// Create a new `CoreConfig`. A `lookup_timeout` of `None` lets lookups run unbounded.
    pub fn new(lookup_timeout: Option<Duration>, cache_labels: bool) -> Self {
        Self {
            lookup_timeout,
            cache_labels,
        }
    }

    /// Build a configuration from raw environment values.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] when either value is present but malformed.
    pub fn from_env_values(
        lookup_timeout: Option<String>,
        cache_labels: Option<String>,
    ) -> CoreResult<Self> {
        Ok(Self::new(
            lookup_timeout_from_env_value(lookup_timeout)?,
            cache_labels_from_env_value(cache_labels)?,
        ))
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_env_values(
            std::env::var(LOOKUP_TIMEOUT_ENV).ok(),
            std::env::var(LABEL_CACHE_ENV).ok(),
        )
    }

    pub fn lookup_timeout(&self) -> Option<Duration> {
        self.lookup_timeout
    }

    pub fn cache_labels(&self) -> bool {
        self.cache_labels
    }

    pub fn with_lookup_timeout(mut self, lookup_timeout: Option<Duration>) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    pub fn with_cache_labels(mut self, cache_labels: bool) -> Self {
        self.cache_labels = cache_labels;
        self
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(Some(Duration::from_millis(DEFAULT_LOOKUP_TIMEOUT_MS)), true)
    }
}

/// Parse the lookup deadline from an optional millisecond value.
///
/// If `value` is `None` or empty/whitespace, returns the default deadline. `0` disables it.
pub fn lookup_timeout_from_env_value(value: Option<String>) -> CoreResult<Option<Duration>> {
    let Some(value) = non_blank(value) else {
        return Ok(Some(Duration::from_millis(DEFAULT_LOOKUP_TIMEOUT_MS)));
    };

    let millis = value.parse::<u64>().map_err(|_| {
        CoreError::InvalidInput(format!(
            "{LOOKUP_TIMEOUT_ENV} must be a whole number of milliseconds, got '{value}'"
        ))
    })?;

    Ok((millis > 0).then(|| Duration::from_millis(millis)))
}

/// Parse the label cache switch from an optional value. Defaults to enabled.
pub fn cache_labels_from_env_value(value: Option<String>) -> CoreResult<bool> {
    let Some(value) = non_blank(value) else {
        return Ok(true);
    };

    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => Err(CoreError::InvalidInput(format!(
            "{LABEL_CACHE_ENV} must be on or off, got '{value}'"
        ))),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
