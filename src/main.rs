use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mni::MniDialect;
use painel_core::{CoreConfig, LabelKind, ProcessNormalizer, StaticLabels};

mod summary;

use summary::Summary;

#[derive(Parser)]
#[command(name = "painel")]
#[command(about = "Normalise MNI 2.2 / 3.0 process records")]
struct Cli {
    /// Per-lookup deadline in milliseconds (0 disables it). Overrides PAINEL_LOOKUP_TIMEOUT_MS.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,
    /// Do not cache resolved labels. Overrides PAINEL_LABEL_CACHE.
    #[arg(long, global = true)]
    no_cache: bool,
    /// Procedural class label table (JSON or YAML)
    #[arg(long, global = true)]
    classes: Option<PathBuf>,
    /// Subject label table (JSON or YAML)
    #[arg(long, global = true)]
    assuntos: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalise a raw process record
    Normalize {
        /// Raw record file; stdin when omitted or `-`
        input: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Report which MNI dialect a raw record appears to use
    Dialect {
        /// Raw record file; stdin when omitted or `-`
        input: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Main entry point for the painel CLI
///
/// # Environment Variables
/// - `PAINEL_LOOKUP_TIMEOUT_MS`: per-lookup deadline (default: 5000, `0` disables it)
/// - `PAINEL_LABEL_CACHE`: `on` or `off` (default: on)
/// - `RUST_LOG`: tracing filter; logs go to stderr
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("painel=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Normalize { input, format } => {
            let config = resolve_config(&cli)?;
            let labels = load_labels(cli.classes.as_deref(), cli.assuntos.as_deref())?;
            let normalizer = ProcessNormalizer::new(labels, &config);

            let raw = read_input(input.as_deref())?;
            let record = normalizer.normalize_str(&raw).await?;
            tracing::info!(
                numero = %record.numero,
                movimentos = record.movimentos.len(),
                documentos = record.documentos.len(),
                "++ Normalised process record"
            );

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
                OutputFormat::Text => print!("{}", Summary(&record)),
            }
        }
        Commands::Dialect { input } => {
            let raw: serde_json::Value = serde_json::from_str(&read_input(input.as_deref())?)?;
            println!("{}", MniDialect::detect(&raw));
        }
    }

    Ok(())
}

/// Environment first, then command-line overrides.
fn resolve_config(cli: &Cli) -> anyhow::Result<CoreConfig> {
    let mut config = CoreConfig::from_env()?;
    if let Some(millis) = cli.timeout_ms {
        config = config.with_lookup_timeout((millis > 0).then(|| Duration::from_millis(millis)));
    }
    if cli.no_cache {
        config = config.with_cache_labels(false);
    }
    Ok(config)
}

fn load_labels(classes: Option<&Path>, assuntos: Option<&Path>) -> anyhow::Result<StaticLabels> {
    let mut labels = StaticLabels::new();
    if let Some(path) = classes {
        labels = labels.load_table(LabelKind::Classe, path)?;
    }
    if let Some(path) = assuntos {
        labels = labels.load_table(LabelKind::Assunto, path)?;
    }
    Ok(labels)
}

fn read_input(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn cli_flags_parse_before_and_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "painel",
            "--no-cache",
            "normalize",
            "record.json",
            "--format",
            "text",
            "--timeout-ms",
            "0",
        ])
        .expect("valid arguments");

        assert!(cli.no_cache);
        assert_eq!(cli.timeout_ms, Some(0));
        match cli.command {
            Commands::Normalize { input, format } => {
                assert_eq!(input, Some(PathBuf::from("record.json")));
                assert_eq!(format, OutputFormat::Text);
            }
            Commands::Dialect { .. } => panic!("expected normalize"),
        }
    }

    #[test]
    fn load_labels_reads_both_tables() {
        let classes = write_temp(r#"{ "7": "Procedimento Comum" }"#);
        let assuntos = write_temp(r#"[{ "codigo": 10433, "descricao": "Dano Moral" }]"#);

        let labels = load_labels(Some(classes.path()), Some(assuntos.path())).expect("tables");
        assert_eq!(labels.get(LabelKind::Classe, "7"), Some("Procedimento Comum"));
        assert_eq!(labels.get(LabelKind::Assunto, "10433"), Some("Dano Moral"));

        assert!(load_labels(None, None).expect("no tables").is_empty());
    }

    #[test]
    fn read_input_reads_files() {
        let file = write_temp(r#"{"dadosBasicos":{}}"#);
        let text = read_input(Some(file.path())).expect("readable");
        assert_eq!(text, r#"{"dadosBasicos":{}}"#);
        assert!(read_input(Some(Path::new("/no/such/record.json"))).is_err());
    }

    #[tokio::test]
    async fn loaded_tables_label_the_record() {
        let classes = write_temp("7: Procedimento Comum\n");
        let labels = load_labels(Some(classes.path()), None).expect("tables");
        let normalizer = ProcessNormalizer::new(labels, &CoreConfig::default());

        let record = normalizer
            .normalize_str(r#"{"dadosBasicos":{"attributes":{"classeProcessual":"7"}}}"#)
            .await
            .expect("object root");
        assert_eq!(
            record.classe_processual.map(|c| c.descricao),
            Some("Procedimento Comum".to_string())
        );
    }
}
