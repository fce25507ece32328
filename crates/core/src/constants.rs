//! Constants used throughout the painel core crate.

/// Environment variable holding the per-lookup deadline in milliseconds.
pub const LOOKUP_TIMEOUT_ENV: &str = "PAINEL_LOOKUP_TIMEOUT_MS";

/// Environment variable switching the process-wide label cache on or off.
pub const LABEL_CACHE_ENV: &str = "PAINEL_LABEL_CACHE";

/// Deadline applied to each label lookup when none is configured.
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5_000;
