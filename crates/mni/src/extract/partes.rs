//! Party extraction: `polo` → `parte` → `pessoa` / `advogado` / `endereco`.

use crate::format::parse_calendar_date;
use crate::public_structs::{Address, Lawyer, Party, Polo, PoloTipo, TipoPessoa};
use crate::resolver::{
    as_list, resolve, resolve_paths, resolve_paths_text, resolve_text, FieldPath, ATTRIBUTES,
    DADOS_BASICOS,
};
use serde_json::Value;

const NOME: &[FieldPath] = &[
    FieldPath::in_bag(ATTRIBUTES, "nome"),
    FieldPath::in_bag(DADOS_BASICOS, "nome"),
    FieldPath::own("nome"),
];

const DOCUMENTO: &[FieldPath] = &[
    FieldPath::in_bag(ATTRIBUTES, "numeroDocumentoPrincipal"),
    FieldPath::in_bag(DADOS_BASICOS, "numeroDocumentoPrincipal"),
    FieldPath::own("numeroDocumentoPrincipal"),
];

const NASCIMENTO: &[FieldPath] = &[
    FieldPath::in_bag(ATTRIBUTES, "dataNascimento"),
    FieldPath::in_bag(DADOS_BASICOS, "dataNascimento"),
    FieldPath::own("dataNascimento"),
];

const TIPO_PESSOA: &[FieldPath] = &[
    FieldPath::in_bag(ATTRIBUTES, "tipoPessoa"),
    FieldPath::own("tipoPessoa"),
    FieldPath::in_bag(DADOS_BASICOS, "tipoPessoa"),
    FieldPath::in_bag(DADOS_BASICOS, "qualificacaoPessoa"),
    FieldPath::own("qualificacaoPessoa"),
    FieldPath::in_bag(ATTRIBUTES, "qualificacaoPessoa"),
];

const ENDERECO: &[FieldPath] = &[
    FieldPath::own("endereco"),
    FieldPath::in_bag(DADOS_BASICOS, "endereco"),
];

/// Extracts every polo from a scalar-or-array `polo` node, in input order.
pub fn extract_polos(node: Option<&Value>) -> Vec<Polo> {
    as_list(node).into_iter().map(extract_polo).collect()
}

/// Extracts a single polo and its parties.
pub fn extract_polo(node: &Value) -> Polo {
    let tipo = resolve_text(node, &["polo"])
        .map(|code| PoloTipo::from_code(&code))
        .unwrap_or_else(|| PoloTipo::Unknown(String::new()));

    let partes = as_list(resolve(node, &["parte"]))
        .into_iter()
        .map(extract_party)
        .collect();

    Polo { tipo, partes }
}

fn extract_party(parte: &Value) -> Party {
    let pessoa = resolve(parte, &["pessoa"])
        .filter(|pessoa| pessoa.is_object())
        .unwrap_or(parte);

    let tipo_pessoa = TipoPessoa::from_code(resolve_paths_text(pessoa, TIPO_PESSOA).as_deref());

    let endereco = resolve_paths(pessoa, ENDERECO).or_else(|| resolve(parte, &["endereco"]));
    let endereco = as_list(endereco).into_iter().next().and_then(extract_address);

    let advogados = as_list(resolve(parte, &["advogado"]))
        .into_iter()
        .map(extract_lawyer)
        .collect();

    Party {
        nome: resolve_paths_text(pessoa, NOME).unwrap_or_default(),
        tipo_pessoa,
        numero_documento: resolve_paths_text(pessoa, DOCUMENTO),
        data_nascimento: resolve_paths_text(pessoa, NASCIMENTO)
            .and_then(|value| parse_calendar_date(&value)),
        endereco,
        advogados,
    }
}

fn extract_address(node: &Value) -> Option<Address> {
    let address = Address {
        logradouro: resolve_text(node, &["logradouro"]),
        numero: resolve_text(node, &["numero"]),
        complemento: resolve_text(node, &["complemento"]),
        bairro: resolve_text(node, &["bairro"]),
        cidade: resolve_text(node, &["cidade"]),
        estado: resolve_text(node, &["estado"]),
        cep: resolve_text(node, &["cep"]),
    };

    (!address.is_empty()).then_some(address)
}

fn extract_lawyer(node: &Value) -> Lawyer {
    Lawyer {
        nome: resolve_text(node, &["nome"]).unwrap_or_default(),
        inscricao: resolve_text(node, &["inscricao"]),
        numero_documento: resolve_text(node, &["numeroDocumentoPrincipal"]),
    }
}
