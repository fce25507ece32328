//! # Painel Core
//!
//! Core normalisation services for the process dashboard.
//!
//! This crate turns raw MNI case records into resolved [`mni::ProcessRecord`]s:
//! - structural normalisation of either dialect, delegated to the `mni` boundary crate
//! - class and subject labels resolved through an injected [`LabelLookup`]
//! - an explicit, shareable [`LabelCache`] and per-lookup deadlines from [`CoreConfig`]
//!
//! **No transport concerns**: fetching records from the gateway, authentication and rendering
//! belong to the callers.

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod labels;
pub mod normalizer;

pub use cache::LabelCache;
pub use config::CoreConfig;
pub use error::{CoreError, CoreResult, LookupError};
pub use labels::{parse_label_table, LabelKind, LabelLookup, LookupResult, NoLabels, StaticLabels};
pub use normalizer::ProcessNormalizer;
