//! Canonical, dialect-agnostic process record.
//!
//! These types are what the extractors produce from either MNI dialect. They carry no trace of
//! where a value was found on the wire, so two payloads describing the same case in different
//! dialects compare equal.

use crate::format::{
    format_byte_size, format_currency, format_date, format_date_time, format_document,
    format_postal_code, format_process_number, NOT_AVAILABLE,
};
use chrono::NaiveDate;
use painel_types::NonEmptyText;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// A normalised case record (`processo`).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRecord {
    /// Case number as received; 20 digits when well-formed.
    pub numero: String,

    /// Procedural class code and its resolved label.
    pub classe_processual: Option<CodedLabel>,

    /// Name of the judging body.
    pub orgao_julgador: Option<String>,

    /// Claim value; `0.0` when missing or malformed.
    pub valor_causa: f64,

    /// Confidentiality tier of the whole case; `None` when not informed.
    pub nivel_sigilo: Option<u32>,

    pub data_ajuizamento: Option<NaiveDate>,

    pub rito: Option<String>,

    /// Priority labels, de-duplicated in order of first appearance.
    pub prioridades: Vec<String>,

    pub polos: Vec<Polo>,

    pub assuntos: Vec<Subject>,

    pub processos_vinculados: Vec<LinkedProcess>,

    /// Timeline, most recent first.
    pub movimentos: Vec<Movement>,

    /// Every document in input order, linked or not.
    pub documentos: Vec<Document>,

    /// Documents grouped by the movement that produced them.
    pub documentos_por_movimento: BTreeMap<NonEmptyText, Vec<Document>>,
}

impl ProcessRecord {
    /// A record with every field at its safe default.
    pub fn empty() -> Self {
        Self {
            numero: String::new(),
            classe_processual: None,
            orgao_julgador: None,
            valor_causa: 0.0,
            nivel_sigilo: None,
            data_ajuizamento: None,
            rito: None,
            prioridades: Vec::new(),
            polos: Vec::new(),
            assuntos: Vec::new(),
            processos_vinculados: Vec::new(),
            movimentos: Vec::new(),
            documentos: Vec::new(),
            documentos_por_movimento: BTreeMap::new(),
        }
    }

    pub fn numero_formatado(&self) -> String {
        format_process_number(&self.numero)
    }

    pub fn valor_causa_formatado(&self) -> String {
        format_currency(self.valor_causa)
    }

    pub fn nivel_sigilo_exibicao(&self) -> String {
        self.nivel_sigilo
            .map_or_else(|| NOT_AVAILABLE.to_string(), |nivel| nivel.to_string())
    }

    pub fn data_ajuizamento_formatada(&self) -> String {
        self.data_ajuizamento.map_or_else(
            || NOT_AVAILABLE.to_string(),
            |date| date.format("%d/%m/%Y").to_string(),
        )
    }

    /// Documents produced by the movement `movimento_id`; empty when there are none.
    pub fn documentos_do_movimento(&self, movimento_id: &str) -> &[Document] {
        self.documentos_por_movimento
            .get(movimento_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Each movement paired with its documents, in timeline order.
    pub fn timeline(&self) -> Vec<(&Movement, &[Document])> {
        self.movimentos
            .iter()
            .map(|movimento| (movimento, self.documentos_do_movimento(movimento.id.as_str())))
            .collect()
    }

    /// The first subject flagged as principal.
    pub fn assunto_principal(&self) -> Option<&Subject> {
        self.assuntos.iter().find(|assunto| assunto.principal)
    }
}

impl Default for ProcessRecord {
    fn default() -> Self {
        Self::empty()
    }
}

/// A code with its human-readable label. The label equals the code when no lookup resolved it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CodedLabel {
    pub codigo: String,
    pub descricao: String,
}

impl CodedLabel {
    /// A label that has not been resolved yet: the description is the code itself.
    pub fn unresolved(codigo: impl Into<String>) -> Self {
        let codigo = codigo.into();
        Self {
            descricao: codigo.clone(),
            codigo,
        }
    }
}

/// Litigation role group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoloTipo {
    Autor,
    Passivo,
    Terceiro,
    /// A code outside the fixed table, kept verbatim. Empty when the wire had no code.
    Unknown(String),
}

impl PoloTipo {
    /// Maps a wire polo code through the fixed table; unknown codes are kept as-is.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "AT" | "AO" => PoloTipo::Autor,
            "PA" => PoloTipo::Passivo,
            "TC" => PoloTipo::Terceiro,
            other => PoloTipo::Unknown(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PoloTipo::Autor => "Autor",
            PoloTipo::Passivo => "Passivo",
            PoloTipo::Terceiro => "Terceiro",
            PoloTipo::Unknown(code) if code.is_empty() => NOT_AVAILABLE,
            PoloTipo::Unknown(code) => code,
        }
    }
}

impl std::fmt::Display for PoloTipo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for PoloTipo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Polo {
    pub tipo: PoloTipo,
    pub partes: Vec<Party>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TipoPessoa {
    #[serde(rename = "Física")]
    Fisica,
    #[serde(rename = "Jurídica")]
    Juridica,
}

impl TipoPessoa {
    /// `juridica` or `JUR` (any case) is a legal entity; anything else is a natural person.
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some(code)
                if code.eq_ignore_ascii_case("juridica") || code.eq_ignore_ascii_case("jur") =>
            {
                TipoPessoa::Juridica
            }
            _ => TipoPessoa::Fisica,
        }
    }

    pub fn is_juridica(self) -> bool {
        matches!(self, TipoPessoa::Juridica)
    }
}

/// A party to the case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub nome: String,
    pub tipo_pessoa: TipoPessoa,
    /// Document number exactly as received (usually raw digits).
    pub numero_documento: Option<String>,
    pub data_nascimento: Option<NaiveDate>,
    pub endereco: Option<Address>,
    pub advogados: Vec<Lawyer>,
}

impl Party {
    /// CPF/CNPJ mask chosen by [`TipoPessoa`].
    pub fn documento_formatado(&self) -> String {
        format_document(
            self.numero_documento.as_deref().unwrap_or_default(),
            self.tipo_pessoa.is_juridica(),
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Address {
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
}

impl Address {
    pub fn cep_formatado(&self) -> String {
        format_postal_code(self.cep.as_deref().unwrap_or_default())
    }

    pub(crate) fn is_empty(&self) -> bool {
        *self == Address::default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lawyer {
    pub nome: String,
    pub inscricao: Option<String>,
    pub numero_documento: Option<String>,
}

/// A subject-matter classification (`assunto`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// National code; empty for subjects that only carry a local code.
    pub codigo_nacional: String,
    /// Court-local code, set only when no national code was sent.
    pub codigo_local: Option<String>,
    pub principal: bool,
    /// Resolved label, or the code itself when no lookup resolved it.
    pub descricao: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedProcess {
    pub numero_processo: String,
    pub vinculo: String,
}

impl LinkedProcess {
    pub fn numero_formatado(&self) -> String {
        format_process_number(&self.numero_processo)
    }
}

/// A procedural event in the timeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: NonEmptyText,
    /// Timestamp in its wire encoding; both encodings sort chronologically as text.
    pub data_hora: String,
    pub descricao: String,
    pub codigo_movimento: Option<String>,
    pub complementos: Vec<String>,
}

impl Movement {
    pub fn data_hora_formatada(&self) -> String {
        format_date_time(&self.data_hora)
    }

    pub fn data_formatada(&self) -> String {
        format_date(&self.data_hora)
    }
}

/// Document metadata. Binary content is never part of the record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub descricao: String,
    pub mimetype: Option<String>,
    pub tamanho_bytes: u64,
    pub nivel_sigilo: u32,
    pub movimento_id: Option<NonEmptyText>,
    pub rotulo: Option<String>,
    pub tipo_documento: Option<String>,
    pub data_hora: Option<String>,
}

impl Document {
    pub fn is_sigiloso(&self) -> bool {
        self.nivel_sigilo > 0
    }

    pub fn tamanho_formatado(&self) -> String {
        format_byte_size(self.tamanho_bytes)
    }
}
