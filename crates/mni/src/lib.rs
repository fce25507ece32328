//! MNI wire/boundary support.
//!
//! This crate is responsible for translating raw case records received over the judicial
//! interoperability protocol (MNI 2.2 and MNI 3.0) into one dialect-agnostic
//! [`ProcessRecord`].
//!
//! The translation here is purely structural and synchronous. Resolving class and subject codes
//! into human-readable labels is done by `painel-core`, which builds on
//! [`normalize_structure`].

pub mod dialect;
pub mod extract;
pub mod format;
pub mod public_structs;
pub mod resolver;

pub use dialect::MniDialect;
pub use extract::{normalize_structure, normalize_structure_str};
pub use public_structs::{
    Address, CodedLabel, Document, Lawyer, LinkedProcess, Movement, Party, Polo, PoloTipo,
    ProcessRecord, Subject, TipoPessoa,
};

use thiserror::Error;

/// Errors returned by the `mni` boundary crate.
#[derive(Debug, Error)]
pub enum MniError {
    #[error("process record root must be a JSON object")]
    NotAnObject,

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub type MniResult<T> = std::result::Result<T, MniError>;
