//! Structural normalisation of a whole `processo`.
//!
//! This is the synchronous half of normalisation: it assembles a [`ProcessRecord`] from either
//! dialect with every class and subject label still equal to its code. Label resolution is an
//! async concern layered on top by the caller.

use crate::dialect::{unwrap_envelope, MniDialect};
use crate::format::{parse_calendar_date, NOT_AVAILABLE};
use crate::public_structs::{CodedLabel, LinkedProcess, ProcessRecord, Subject};
use crate::resolver::{
    as_list, parse_decimal_or_zero, parse_flag, parse_u32_or_zero, resolve, resolve_text,
    text_of, DADOS_BASICOS,
};
use crate::{MniError, MniResult};
use serde_json::Value;

use super::{extract_documentos, extract_movimentos, extract_polos};

/// Fixed labels for linked-process relation codes.
const VINCULOS: &[(&str, &str)] = &[
    ("CX", "Conexão"),
    ("CT", "Continência"),
    ("DP", "Dependência"),
    ("AR", "Ação rescisória"),
    ("OR", "Originário"),
];

/// Where the pieces of a record live once the envelope is removed.
///
/// `basicos` is the innermost non-empty basic-data object: `dadosBasicos.dadosBasicos` in MNI
/// 3.0, `dadosBasicos` in MNI 2.2.
#[derive(Clone, Copy)]
struct Scopes<'a> {
    root: &'a Value,
    outer: Option<&'a Value>,
    basicos: Option<&'a Value>,
}

impl<'a> Scopes<'a> {
    fn locate(root: &'a Value) -> Self {
        let outer = root.get(DADOS_BASICOS).and_then(non_empty_object);
        let basicos = outer
            .and_then(|outer| outer.get(DADOS_BASICOS))
            .and_then(non_empty_object)
            .or(outer);

        Self {
            root,
            outer,
            basicos,
        }
    }

    /// Header fields and case-level lists: basic data first, then outward.
    fn header(&self, keys: &[&'static str]) -> Option<&'a Value> {
        [self.basicos, self.outer, Some(self.root)]
            .into_iter()
            .flatten()
            .find_map(|scope| resolve(scope, keys))
    }

    /// Timeline lists: the record root first, then basic data.
    fn timeline(&self, keys: &[&'static str]) -> Option<&'a Value> {
        [Some(self.root), self.basicos, self.outer]
            .into_iter()
            .flatten()
            .find_map(|scope| resolve(scope, keys))
    }
}

fn non_empty_object(value: &Value) -> Option<&Value> {
    value
        .as_object()
        .filter(|object| !object.is_empty())
        .map(|_| value)
}

/// Builds a [`ProcessRecord`] from a raw record of either dialect.
///
/// Class and subject descriptions are left equal to their codes, except subjects that only
/// carry a local code, which keep the local description sent on the wire.
///
/// # Errors
///
/// Returns [`MniError::NotAnObject`] when `raw` is not a JSON object. Any object, even one with
/// none of the expected fields, yields a record with safe defaults.
pub fn normalize_structure(raw: &Value) -> MniResult<ProcessRecord> {
    if !raw.is_object() {
        return Err(MniError::NotAnObject);
    }

    let root = unwrap_envelope(raw);
    let scopes = Scopes::locate(root);

    let documentos = extract_documentos(scopes.timeline(&["documento"]));

    let record = ProcessRecord {
        numero: scopes
            .header(&["numero"])
            .and_then(text_of)
            .unwrap_or_default(),
        classe_processual: scopes
            .header(&["classeProcessual"])
            .and_then(coded_text)
            .map(CodedLabel::unresolved),
        orgao_julgador: scopes.header(&["orgaoJulgador"]).and_then(orgao_julgador),
        valor_causa: parse_decimal_or_zero(scopes.header(&["valorCausa"])),
        nivel_sigilo: scopes
            .header(&["nivelSigilo"])
            .map(|nivel| parse_u32_or_zero(Some(nivel))),
        data_ajuizamento: scopes
            .header(&["dataAjuizamento"])
            .and_then(text_of)
            .and_then(|value| parse_calendar_date(&value)),
        rito: scopes.header(&["rito"]).and_then(coded_text),
        prioridades: prioridades(scopes.header(&["prioridade"])),
        polos: extract_polos(scopes.header(&["polo"])),
        assuntos: as_list(scopes.header(&["assunto"]))
            .into_iter()
            .filter_map(extract_assunto)
            .collect(),
        processos_vinculados: as_list(scopes.header(&["processoVinculado"]))
            .into_iter()
            .filter_map(extract_vinculado)
            .collect(),
        movimentos: extract_movimentos(scopes.timeline(&["movimento"])),
        documentos: documentos.documentos,
        documentos_por_movimento: documentos.por_movimento,
    };

    tracing::debug!(
        dialect = %MniDialect::detect(raw),
        polos = record.polos.len(),
        assuntos = record.assuntos.len(),
        movimentos = record.movimentos.len(),
        documentos = record.documentos.len(),
        "normalised process record structure"
    );

    Ok(record)
}

/// Parses `input` as JSON and runs [`normalize_structure`] on it.
pub fn normalize_structure_str(input: &str) -> MniResult<ProcessRecord> {
    let raw: Value = serde_json::from_str(input)?;
    normalize_structure(&raw)
}

/// Label for a linked-process relation code; unknown codes are returned unchanged.
pub fn vinculo_label(code: &str) -> String {
    let code = code.trim();
    if code.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    VINCULOS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code))
        .map_or_else(|| code.to_string(), |(_, label)| (*label).to_string())
}

/// A code given either as a scalar or as an object carrying `codigo`.
fn coded_text(value: &Value) -> Option<String> {
    text_of(value).or_else(|| resolve_text(value, &["codigo", "codigoNacional", "descricao"]))
}

/// `orgaoJulgador` is an object with `nomeOrgao` in both dialects; a bare string is accepted too.
fn orgao_julgador(value: &Value) -> Option<String> {
    resolve_text(value, &["nomeOrgao"]).or_else(|| text_of(value))
}

fn prioridades(node: Option<&Value>) -> Vec<String> {
    let mut prioridades: Vec<String> = Vec::new();
    for prioridade in as_list(node).into_iter().filter_map(text_of) {
        if !prioridades.contains(&prioridade) {
            prioridades.push(prioridade);
        }
    }
    prioridades
}

/// A subject by national code, or by local code when no national one was sent. Subjects with
/// neither are dropped.
fn extract_assunto(node: &Value) -> Option<Subject> {
    let principal = parse_flag(resolve(node, &["principal"]));

    if let Some(codigo) = resolve_text(node, &["codigoNacional"]) {
        return Some(Subject {
            descricao: codigo.clone(),
            codigo_nacional: codigo,
            codigo_local: None,
            principal,
        });
    }

    let local = resolve(node, &["assuntoLocal"])?;
    let codigo_local = resolve_text(local, &["codigoAssunto"])?;
    let descricao = resolve_text(local, &["descricao"]).unwrap_or_else(|| codigo_local.clone());

    Some(Subject {
        codigo_nacional: String::new(),
        codigo_local: Some(codigo_local),
        principal,
        descricao,
    })
}

fn extract_vinculado(node: &Value) -> Option<LinkedProcess> {
    let numero_processo = resolve_text(node, &["numeroProcesso"])?;
    let vinculo = resolve_text(node, &["vinculo"]).unwrap_or_default();

    Some(LinkedProcess {
        numero_processo,
        vinculo: vinculo_label(&vinculo),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::public_structs::{PoloTipo, TipoPessoa};
    use chrono::NaiveDate;
    use serde_json::json;

    fn dialect_a() -> Value {
        json!({
            "processo": {
                "dadosBasicos": {
                    "attributes": {
                        "numero": "01234567820258260001",
                        "classeProcessual": "7",
                        "nivelSigilo": "0",
                        "dataAjuizamento": "20250110093000"
                    },
                    "orgaoJulgador": { "attributes": { "nomeOrgao": "1ª Vara Cível" } },
                    "valorCausa": "1234.56",
                    "prioridade": ["Idoso", "Idoso", "Deficiente"],
                    "polo": {
                        "attributes": { "polo": "AT" },
                        "parte": {
                            "pessoa": {
                                "attributes": {
                                    "nome": "MARIA DA SILVA",
                                    "tipoPessoa": "fisica",
                                    "numeroDocumentoPrincipal": "12345678901"
                                }
                            }
                        }
                    },
                    "assunto": [
                        { "attributes": { "principal": "S" }, "codigoNacional": "10433" },
                        { "assuntoLocal": { "attributes": { "codigoAssunto": "55", "descricao": "Cobrança local" } } }
                    ],
                    "processoVinculado": {
                        "attributes": { "numeroProcesso": "00000011120248260001", "vinculo": "CX" }
                    }
                },
                "movimento": [
                    {
                        "attributes": { "dataHora": "20250111100000", "identificadorMovimento": "m1" },
                        "movimentoLocal": { "attributes": { "codigoMovimento": "26", "descricao": "Distribuído" } }
                    },
                    {
                        "attributes": { "dataHora": "20250115143000", "identificadorMovimento": "m2" },
                        "movimentoLocal": { "attributes": { "codigoMovimento": "85", "descricao": "Petição juntada" } }
                    }
                ],
                "documento": [
                    {
                        "attributes": {
                            "idDocumento": "d1",
                            "descricao": "Petição inicial",
                            "mimetype": "application/pdf",
                            "nivelSigilo": "0",
                            "movimento": "m2"
                        },
                        "outroParametro": { "attributes": { "nome": "tamanho", "valor": "2048" } }
                    },
                    { "attributes": { "idDocumento": "d2", "descricao": "Procuração", "nivelSigilo": "1" } }
                ]
            }
        })
    }

    fn dialect_b() -> Value {
        json!({
            "dadosBasicos": {
                "dadosBasicos": {
                    "numero": "01234567820258260001",
                    "classeProcessual": 7,
                    "nivelSigilo": 0,
                    "dataAjuizamento": "2025-01-10T09:30:00-03:00",
                    "orgaoJulgador": { "nomeOrgao": "1ª Vara Cível" },
                    "valorCausa": 1234.56
                },
                "prioridade": ["Idoso", "Deficiente"],
                "polo": [{
                    "polo": "AT",
                    "parte": [{
                        "pessoa": {
                            "dadosBasicos": {
                                "nome": "MARIA DA SILVA",
                                "qualificacaoPessoa": "FIS",
                                "numeroDocumentoPrincipal": "12345678901"
                            }
                        }
                    }]
                }],
                "assunto": [
                    { "principal": true, "codigoNacional": 10433 },
                    { "assuntoLocal": { "codigoAssunto": 55, "descricao": "Cobrança local" } }
                ],
                "processoVinculado": [{ "numeroProcesso": "00000011120248260001", "vinculo": "CX" }]
            },
            "movimento": [
                {
                    "idMovimento": "m1",
                    "dataHora": "2025-01-11T10:00:00-03:00",
                    "movimentoLocal": { "codigoMovimento": 26, "descricao": "Distribuído" }
                },
                {
                    "idMovimento": "m2",
                    "dataHora": "2025-01-15T14:30:00-03:00",
                    "movimentoLocal": { "codigoMovimento": 85, "descricao": "Petição juntada" }
                }
            ],
            "documento": [
                {
                    "idDocumento": "d1",
                    "idMovimento": "m2",
                    "descricao": "Petição inicial",
                    "nivelSigilo": 0,
                    "tamanhoConteudo": 2048,
                    "conteudo": { "mimetype": "application/pdf" }
                },
                { "idDocumento": "d2", "descricao": "Procuração", "nivelSigilo": 1 }
            ]
        })
    }

    /// Movement timestamps keep their wire encoding; compare them through the formatter.
    fn without_wire_timestamps(mut record: ProcessRecord) -> (ProcessRecord, Vec<String>) {
        let rendered = record
            .movimentos
            .iter()
            .map(|movimento| movimento.data_hora_formatada())
            .collect();
        for movimento in &mut record.movimentos {
            movimento.data_hora.clear();
        }
        (record, rendered)
    }

    #[test]
    fn dialect_a_record_is_fully_extracted() {
        let record = normalize_structure(&dialect_a()).expect("object root");

        assert_eq!(record.numero_formatado(), "0123456-78.2025.8.26.0001");
        assert_eq!(record.classe_processual, Some(CodedLabel::unresolved("7")));
        assert_eq!(record.orgao_julgador.as_deref(), Some("1ª Vara Cível"));
        assert_eq!(record.valor_causa_formatado(), "R$ 1.234,56");
        assert_eq!(record.nivel_sigilo, Some(0));
        assert_eq!(record.data_ajuizamento, NaiveDate::from_ymd_opt(2025, 1, 10));
        assert_eq!(record.prioridades, vec!["Idoso", "Deficiente"]);

        assert_eq!(record.polos.len(), 1);
        assert_eq!(record.polos[0].tipo, PoloTipo::Autor);
        assert_eq!(record.polos[0].partes[0].tipo_pessoa, TipoPessoa::Fisica);

        assert_eq!(record.assuntos.len(), 2);
        assert!(record.assuntos[0].principal);
        assert_eq!(record.assuntos[0].descricao, "10433");
        assert_eq!(record.assuntos[1].codigo_local.as_deref(), Some("55"));
        assert_eq!(record.assuntos[1].descricao, "Cobrança local");
        assert_eq!(record.assunto_principal().map(|a| a.codigo_nacional.as_str()), Some("10433"));

        assert_eq!(record.processos_vinculados[0].vinculo, "Conexão");

        let ids: Vec<&str> = record.movimentos.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m1"]);

        assert_eq!(record.documentos.len(), 2);
        assert_eq!(record.documentos[0].tamanho_bytes, 2048);
        assert!(record.documentos[1].is_sigiloso());
    }

    #[test]
    fn both_dialects_normalise_to_the_same_record() {
        let a = normalize_structure(&dialect_a()).expect("object root");
        let b = normalize_structure(&dialect_b()).expect("object root");

        let (a, a_times) = without_wire_timestamps(a);
        let (b, b_times) = without_wire_timestamps(b);
        assert_eq!(a_times, vec!["15/01/2025 14:30", "11/01/2025 10:00"]);
        assert_eq!(a_times, b_times);
        assert_eq!(a, b);
    }

    #[test]
    fn normalising_twice_is_idempotent() {
        let raw = dialect_b();
        let first = normalize_structure(&raw).expect("object root");
        let second = normalize_structure(&raw).expect("object root");
        assert_eq!(first, second);
    }

    #[test]
    fn documents_join_their_movement_only() {
        let record = normalize_structure(&dialect_a()).expect("object root");

        let linked: Vec<&str> = record
            .documentos_do_movimento("m2")
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(linked, vec!["d1"]);
        assert!(record.documentos_do_movimento("m1").is_empty());

        let indexed: usize = record.documentos_por_movimento.values().map(Vec::len).sum();
        assert_eq!(indexed, 1);

        let timeline = record.timeline();
        assert_eq!(timeline[0].0.id.as_str(), "m2");
        assert_eq!(timeline[0].1.len(), 1);
    }

    #[test]
    fn movement_without_id_never_takes_a_wire_id() {
        let record = normalize_structure(&json!({
            "movimento": [
                { "dataHora": "20250101" },
                { "idMovimento": "#0", "dataHora": "20240101" }
            ],
            "documento": [{ "idDocumento": "d", "idMovimento": "#0" }]
        }))
        .expect("object root");

        let timeline = record.timeline();
        assert_eq!(timeline.len(), 2);
        assert_ne!(timeline[0].0.id, timeline[1].0.id);
        assert!(timeline[0].1.is_empty());
        assert_eq!(timeline[1].0.id.as_str(), "#0");
        assert_eq!(timeline[1].1.len(), 1);

        let listed: usize = timeline.iter().map(|(_, docs)| docs.len()).sum();
        assert_eq!(listed, 1);
    }

    #[test]
    fn non_object_roots_are_rejected() {
        for raw in [Value::Null, json!([]), json!("processo"), json!(42)] {
            assert!(matches!(
                normalize_structure(&raw),
                Err(MniError::NotAnObject)
            ));
        }
    }

    #[test]
    fn empty_object_yields_safe_defaults() {
        let record = normalize_structure(&json!({})).expect("object root");
        assert_eq!(record, ProcessRecord::empty());
        assert_eq!(record.numero_formatado(), NOT_AVAILABLE);
        assert_eq!(record.nivel_sigilo_exibicao(), NOT_AVAILABLE);

        let record = normalize_structure(&json!({ "dadosBasicos": {}, "processo": null }))
            .expect("object root");
        assert_eq!(record, ProcessRecord::empty());
    }

    #[test]
    fn malformed_numbers_default_to_zero() {
        let raw = json!({
            "dadosBasicos": { "attributes": { "nivelSigilo": "alto" }, "valorCausa": "muito" }
        });
        let record = normalize_structure(&raw).expect("object root");
        assert_eq!(record.valor_causa, 0.0);
        assert_eq!(record.nivel_sigilo, Some(0));
    }

    #[test]
    fn empty_inner_basic_data_falls_back_to_outer() {
        let raw = json!({
            "dadosBasicos": { "dadosBasicos": {}, "numero": "01234567820258260001" }
        });
        let record = normalize_structure(&raw).expect("object root");
        assert_eq!(record.numero, "01234567820258260001");
    }

    #[test]
    fn subjects_without_any_code_are_dropped() {
        let raw = json!({ "dadosBasicos": { "assunto": [{ "principal": "true" }, { "codigoNacional": "1" }] } });
        let record = normalize_structure(&raw).expect("object root");
        assert_eq!(record.assuntos.len(), 1);
        assert!(!record.assuntos[0].principal);
    }

    #[test]
    fn vinculo_codes_use_fixed_table() {
        assert_eq!(vinculo_label("CX"), "Conexão");
        assert_eq!(vinculo_label("ct"), "Continência");
        assert_eq!(vinculo_label("DP"), "Dependência");
        assert_eq!(vinculo_label("AR"), "Ação rescisória");
        assert_eq!(vinculo_label("OR"), "Originário");
        assert_eq!(vinculo_label("ZZ"), "ZZ");
        assert_eq!(vinculo_label(""), NOT_AVAILABLE);
    }

    #[test]
    fn text_input_is_parsed_first() {
        assert!(matches!(
            normalize_structure_str("{not json"),
            Err(MniError::InvalidJson(_))
        ));
        assert!(matches!(
            normalize_structure_str("null"),
            Err(MniError::NotAnObject)
        ));
        let record = normalize_structure_str(r#"{"dadosBasicos":{"numero":"1"}}"#)
            .expect("valid json object");
        assert_eq!(record.numero, "1");
    }
}
