//! Plain-text rendering of a normalised record.
//!
//! Output is deterministic: it only depends on the record, and every scalar goes through the
//! `mni` formatters.

use mni::format::NOT_AVAILABLE;
use mni::{Document, Party, ProcessRecord};
use std::collections::HashSet;
use std::fmt;

/// Displays a [`ProcessRecord`] as a human-readable summary.
pub struct Summary<'a>(pub &'a ProcessRecord);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;

        writeln!(f, "Processo: {}", record.numero_formatado())?;
        match &record.classe_processual {
            Some(classe) if classe.descricao != classe.codigo => {
                writeln!(f, "Classe: {} ({})", classe.descricao, classe.codigo)?
            }
            Some(classe) => writeln!(f, "Classe: {}", classe.codigo)?,
            None => writeln!(f, "Classe: {NOT_AVAILABLE}")?,
        }
        writeln!(f, "Órgão julgador: {}", or_na(record.orgao_julgador.as_deref()))?;
        writeln!(f, "Valor da causa: {}", record.valor_causa_formatado())?;
        writeln!(f, "Nível de sigilo: {}", record.nivel_sigilo_exibicao())?;
        writeln!(f, "Data de ajuizamento: {}", record.data_ajuizamento_formatada())?;
        writeln!(f, "Rito: {}", or_na(record.rito.as_deref()))?;
        if record.prioridades.is_empty() {
            writeln!(f, "Prioridades: {NOT_AVAILABLE}")?;
        } else {
            writeln!(f, "Prioridades: {}", record.prioridades.join(", "))?;
        }

        writeln!(f, "\nPolos")?;
        for polo in &record.polos {
            writeln!(f, "  {}", polo.tipo)?;
            for parte in &polo.partes {
                write_party(f, parte)?;
            }
        }

        writeln!(f, "\nAssuntos")?;
        for assunto in &record.assuntos {
            let codigo = assunto
                .codigo_local
                .as_deref()
                .filter(|_| assunto.codigo_nacional.is_empty())
                .unwrap_or(&assunto.codigo_nacional);
            let marker = if assunto.principal { " [principal]" } else { "" };
            writeln!(f, "  - {codigo} {}{marker}", assunto.descricao)?;
        }

        if !record.processos_vinculados.is_empty() {
            writeln!(f, "\nProcessos vinculados")?;
            for vinculado in &record.processos_vinculados {
                writeln!(f, "  - {} ({})", vinculado.numero_formatado(), vinculado.vinculo)?;
            }
        }

        writeln!(f, "\nMovimentos")?;
        for (movimento, documentos) in record.timeline() {
            writeln!(
                f,
                "  - {} {} [{}]",
                movimento.data_hora_formatada(),
                movimento.descricao,
                movimento.id
            )?;
            for complemento in &movimento.complementos {
                writeln!(f, "      {complemento}")?;
            }
            for documento in documentos {
                write!(f, "      * ")?;
                write_document(f, documento)?;
            }
        }

        let movimento_ids: HashSet<&str> =
            record.movimentos.iter().map(|m| m.id.as_str()).collect();
        let avulsos: Vec<&Document> = record
            .documentos
            .iter()
            .filter(|d| {
                d.movimento_id
                    .as_ref()
                    .is_none_or(|id| !movimento_ids.contains(id.as_str()))
            })
            .collect();
        if !avulsos.is_empty() {
            writeln!(f, "\nDocumentos sem movimento")?;
            for documento in avulsos {
                write!(f, "  - ")?;
                write_document(f, documento)?;
            }
        }

        Ok(())
    }
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

fn write_party(f: &mut fmt::Formatter<'_>, parte: &Party) -> fmt::Result {
    let tipo = if parte.tipo_pessoa.is_juridica() {
        "Jurídica"
    } else {
        "Física"
    };
    writeln!(
        f,
        "    - {} ({tipo}, {})",
        parte.nome,
        parte.documento_formatado()
    )?;
    if let Some(endereco) = &parte.endereco {
        writeln!(
            f,
            "      {}, {} - {}/{} CEP {}",
            or_na(endereco.logradouro.as_deref()),
            or_na(endereco.numero.as_deref()),
            or_na(endereco.cidade.as_deref()),
            or_na(endereco.estado.as_deref()),
            endereco.cep_formatado()
        )?;
    }
    for advogado in &parte.advogados {
        writeln!(
            f,
            "      Advogado: {} ({})",
            advogado.nome,
            or_na(advogado.inscricao.as_deref())
        )?;
    }
    Ok(())
}

fn write_document(f: &mut fmt::Formatter<'_>, documento: &Document) -> fmt::Result {
    write!(
        f,
        "{} {} ({}, {})",
        documento.id,
        documento.descricao,
        or_na(documento.mimetype.as_deref()),
        documento.tamanho_formatado()
    )?;
    if documento.is_sigiloso() {
        write!(f, " sigiloso")?;
    }
    writeln!(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> ProcessRecord {
        mni::normalize_structure(&json!({
            "dadosBasicos": {
                "attributes": {
                    "numero": "01234567820258260001",
                    "classeProcessual": "7",
                    "nivelSigilo": "0",
                    "dataAjuizamento": "20250110"
                },
                "valorCausa": "1500",
                "polo": {
                    "attributes": { "polo": "PA" },
                    "parte": {
                        "pessoa": {
                            "attributes": {
                                "nome": "ACME LTDA",
                                "tipoPessoa": "juridica",
                                "numeroDocumentoPrincipal": "12345678000199"
                            }
                        },
                        "advogado": { "attributes": { "nome": "DRA. ANA", "inscricao": "SP1" } }
                    }
                },
                "assunto": { "attributes": { "principal": "S" }, "codigoNacional": "10433" }
            },
            "movimento": {
                "attributes": { "dataHora": "20250115143000", "identificadorMovimento": "m1" },
                "movimentoLocal": { "attributes": { "descricao": "Juntada" } }
            },
            "documento": [
                {
                    "attributes": { "idDocumento": "d1", "descricao": "Petição", "mimetype": "application/pdf", "movimento": "m1" },
                    "outroParametro": { "attributes": { "nome": "tamanho", "valor": "2048" } }
                },
                { "attributes": { "idDocumento": "d2", "descricao": "Laudo", "nivelSigilo": "3" } }
            ]
        }))
        .expect("object root")
    }

    #[test]
    fn renders_header_with_formatters() {
        let text = Summary(&record()).to_string();
        assert!(text.contains("Processo: 0123456-78.2025.8.26.0001\n"));
        assert!(text.contains("Classe: 7\n"));
        assert!(text.contains("Valor da causa: R$ 1.500,00\n"));
        assert!(text.contains("Nível de sigilo: 0\n"));
        assert!(text.contains("Data de ajuizamento: 10/01/2025\n"));
        assert!(text.contains("Prioridades: N/A\n"));
    }

    #[test]
    fn renders_parties_subjects_and_timeline() {
        let text = Summary(&record()).to_string();
        assert!(text.contains("  Passivo\n    - ACME LTDA (Jurídica, 12.345.678/0001-99)\n"));
        assert!(text.contains("      Advogado: DRA. ANA (SP1)\n"));
        assert!(text.contains("  - 10433 10433 [principal]\n"));
        assert!(text.contains("  - 15/01/2025 14:30 Juntada [m1]\n      * d1 Petição (application/pdf, 2 KB)\n"));
        assert!(text.contains("Documentos sem movimento\n  - d2 Laudo (N/A, 0 B) sigiloso\n"));
    }

    #[test]
    fn empty_record_renders_sentinels() {
        let text = Summary(&ProcessRecord::empty()).to_string();
        assert!(text.starts_with("Processo: N/A\nClasse: N/A\n"));
        assert!(!text.contains("Documentos sem movimento"));
        assert_eq!(text, Summary(&ProcessRecord::empty()).to_string());
    }
}
