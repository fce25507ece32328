//! Extractors from raw MNI nodes into [`crate::public_structs`] types.
//!
//! Each extractor accepts nodes of either dialect and normalises scalar-or-array cardinality
//! through [`crate::resolver::as_list`] before walking a list.

pub mod documentos;
pub mod movimentos;
pub mod partes;
pub mod processo;

pub use documentos::{extract_documento, extract_documentos, ExtractedDocuments};
pub use movimentos::{extract_movimento, extract_movimentos};
pub use partes::{extract_polo, extract_polos};
pub use processo::{normalize_structure, normalize_structure_str, vinculo_label};
