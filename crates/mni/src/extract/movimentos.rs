//! Movement (timeline) extraction.

use crate::public_structs::Movement;
use crate::resolver::{
    as_list, resolve, resolve_paths_text, resolve_text, text_of, FieldPath, ATTRIBUTES,
};
use painel_types::NonEmptyText;
use serde_json::Value;
use std::collections::HashSet;

const ID: &[FieldPath] = &[
    FieldPath::in_bag(ATTRIBUTES, "identificadorMovimento"),
    FieldPath::own("idMovimento"),
    FieldPath::own("identificadorMovimento"),
    FieldPath::in_bag(ATTRIBUTES, "idMovimento"),
];

/// Extracts movements from a scalar-or-array `movimento` node, most recent first.
///
/// Ordering compares the wire `dataHora` text. Both wire encodings sort chronologically as
/// text, and the sort is stable so equal timestamps keep their input order.
///
/// Movements without an id get a positional one that never equals an id sent on the wire, so
/// documents linked to a real movement cannot land in a synthesized movement's bucket.
pub fn extract_movimentos(node: Option<&Value>) -> Vec<Movement> {
    let nodes = as_list(node);
    let mut taken: HashSet<String> = nodes
        .iter()
        .filter_map(|node| wire_id(node))
        .map(NonEmptyText::into_inner)
        .collect();

    let mut movimentos: Vec<Movement> = nodes
        .into_iter()
        .enumerate()
        .map(|(position, node)| {
            let id = wire_id(node).unwrap_or_else(|| positional_id(position, &mut taken));
            build_movimento(node, id)
        })
        .collect();

    movimentos.sort_by(|a, b| b.data_hora.cmp(&a.data_hora));
    movimentos
}

/// Extracts one movement. `position` is its index in the input, used to build an id when the
/// wire carries none.
pub fn extract_movimento(node: &Value, position: usize) -> Movement {
    let id = wire_id(node).unwrap_or_else(|| positional_id(position, &mut HashSet::new()));
    build_movimento(node, id)
}

fn wire_id(node: &Value) -> Option<NonEmptyText> {
    resolve_paths_text(node, ID).and_then(|id| NonEmptyText::new(id).ok())
}

fn build_movimento(node: &Value, id: NonEmptyText) -> Movement {
    let local = resolve(node, &["movimentoLocal"]);
    let nacional = resolve(node, &["movimentoNacional"]);

    let descricao = local
        .and_then(|local| resolve_text(local, &["descricao"]))
        .or_else(|| resolve_text(node, &["descricao"]))
        .unwrap_or_default();

    let codigo_movimento = local
        .and_then(|local| resolve_text(local, &["codigoMovimento"]))
        .or_else(|| nacional.and_then(|nacional| resolve_text(nacional, &["codigoNacional"])));

    let complementos = resolve(node, &["complemento"])
        .or_else(|| nacional.and_then(|nacional| resolve(nacional, &["complemento"])));

    Movement {
        id,
        data_hora: resolve_text(node, &["dataHora"]).unwrap_or_default(),
        descricao,
        codigo_movimento,
        complementos: as_list(complementos).into_iter().filter_map(text_of).collect(),
    }
}

/// `#<position>`, suffixed with `.1`, `.2`, ... until it is not in `taken`. The chosen id is
/// added to `taken`.
fn positional_id(position: usize, taken: &mut HashSet<String>) -> NonEmptyText {
    let mut candidate = format!("#{position}");
    let mut suffix = 0;
    while taken.contains(&candidate) {
        suffix += 1;
        candidate = format!("#{position}.{suffix}");
    }
    taken.insert(candidate.clone());
    NonEmptyText::new(candidate).expect("positional id is non-empty")
}
