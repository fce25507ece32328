//! Document extraction and the movement → documents index.

use crate::public_structs::Document;
use crate::resolver::{
    as_list, parse_u32_or_zero, parse_u64_or_zero, resolve, resolve_paths, resolve_paths_text,
    resolve_text, FieldPath, ATTRIBUTES,
};
use painel_types::NonEmptyText;
use serde_json::Value;
use std::collections::BTreeMap;

const MIMETYPE: &[FieldPath] = &[
    FieldPath::in_bag(ATTRIBUTES, "mimetype"),
    FieldPath::in_bag("conteudo", "mimetype"),
    FieldPath::own("mimetype"),
];

const TAMANHO_CONTEUDO: &[FieldPath] = &[
    FieldPath::own("tamanhoConteudo"),
    FieldPath::in_bag(ATTRIBUTES, "tamanhoConteudo"),
];

const MOVIMENTO: &[FieldPath] = &[
    FieldPath::in_bag(ATTRIBUTES, "movimento"),
    FieldPath::own("idMovimento"),
    FieldPath::in_bag(ATTRIBUTES, "idMovimento"),
];

/// Name of the `outroParametro` entry that carries the document size in MNI 2.2.
const PARAMETRO_TAMANHO: &str = "tamanho";

/// Documents of a record: the flat list plus the index keyed by movement id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedDocuments {
    pub documentos: Vec<Document>,
    pub por_movimento: BTreeMap<NonEmptyText, Vec<Document>>,
}

/// Extracts documents from a scalar-or-array `documento` node.
///
/// Every document lands in the flat list. Only documents with a resolvable movement id are
/// added to the index, under exactly that id.
pub fn extract_documentos(node: Option<&Value>) -> ExtractedDocuments {
    let documentos: Vec<Document> = as_list(node).into_iter().map(extract_documento).collect();

    let mut por_movimento: BTreeMap<NonEmptyText, Vec<Document>> = BTreeMap::new();
    for documento in &documentos {
        if let Some(movimento_id) = &documento.movimento_id {
            por_movimento
                .entry(movimento_id.clone())
                .or_default()
                .push(documento.clone());
        }
    }

    ExtractedDocuments {
        documentos,
        por_movimento,
    }
}

/// Extracts a single document.
pub fn extract_documento(node: &Value) -> Document {
    Document {
        id: resolve_text(node, &["idDocumento", "id"]).unwrap_or_default(),
        descricao: resolve_text(node, &["descricao"]).unwrap_or_default(),
        mimetype: resolve_paths_text(node, MIMETYPE),
        tamanho_bytes: parse_u64_or_zero(tamanho(node)),
        nivel_sigilo: parse_u32_or_zero(resolve(node, &["nivelSigilo"])),
        movimento_id: resolve_paths_text(node, MOVIMENTO)
            .and_then(|id| NonEmptyText::new(id).ok()),
        rotulo: resolve_text(node, &["rotulo"]),
        tipo_documento: resolve_text(node, &["tipoDocumento"]),
        data_hora: resolve_text(node, &["dataHora"]),
    }
}

/// The raw size value: an `outroParametro` named `tamanho` first, then `tamanhoConteudo`.
fn tamanho(node: &Value) -> Option<&Value> {
    as_list(resolve(node, &["outroParametro"]))
        .into_iter()
        .find(|parametro| {
            resolve_text(parametro, &["nome"]).as_deref() == Some(PARAMETRO_TAMANHO)
        })
        .and_then(|parametro| resolve(parametro, &["valor"]))
        .or_else(|| resolve_paths(node, TAMANHO_CONTEUDO))
}
