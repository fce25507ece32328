//! Public, dialect-agnostic domain types.
//!
//! External code works with these without knowing which MNI version the record came from.

pub mod processo;

pub use processo::{
    Address, CodedLabel, Document, Lawyer, LinkedProcess, Movement, Party, Polo, PoloTipo,
    ProcessRecord, Subject, TipoPessoa,
};
