//! `dataspace-import`: translate DSpace items into OSTI E-Link records.
//!
//! Fetches one item (`--id`) or every member of a collection (`--collection`)
//! and prints the translated records to stdout. Logs go to stderr.

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use dataspace_osti::{elink, HttpTransport, ImportError, Importer, SourceConfig, TranslatedRecord};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Exit status for an item the source does not know.
const EXIT_NOT_FOUND: i32 = 404;
/// Exit status for an item that exists but is restricted.
const EXIT_UNAVAILABLE: i32 = 400;

/// Translate DSpace items into OSTI E-Link dataset records
#[derive(Debug, Parser)]
#[command(name = "dataspace-import", version, about, long_about = None)]
#[command(group(ArgGroup::new("target").required(true).args(["id", "collection"])))]
struct Cli {
    /// DSpace REST API host name
    #[arg(short = 'd', long = "host")]
    host: Option<String>,

    /// Single item ID to import
    #[arg(short, long)]
    id: Option<String>,

    /// Collection ID to import
    #[arg(short, long)]
    collection: Option<String>,

    /// Default contract number for the records
    #[arg(short = 'n', long = "contractno")]
    contract_no: Option<String>,

    /// OSTI dataset type for the records
    #[arg(long)]
    dataset_type: Option<String>,

    /// Configuration file, read only if present
    #[arg(long, default_value = "import.toml")]
    config: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Xml)]
    format: OutputFormat,

    /// Do not verify the source's TLS certificate
    #[arg(long)]
    insecure: bool,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// OSTI E-Link XML
    Xml,
    /// JSON array of records
    Json,
}

impl Cli {
    /// Defaults, then environment, then the config file, then flags.
    fn source_config(&self) -> Result<SourceConfig> {
        let mut config = SourceConfig::from_env()
            .merge_toml_file(&self.config)
            .context("loading configuration")?;

        if let Some(host) = &self.host {
            config.hostname.clone_from(host);
        }
        if let Some(contract_no) = &self.contract_no {
            config.contract_no = Some(contract_no.clone());
        }
        if let Some(dataset_type) = &self.dataset_type {
            config.dataset_type.clone_from(dataset_type);
        }
        if self.insecure {
            config.verify_tls = false;
        }
        Ok(config)
    }
}

fn render(records: &[TranslatedRecord], format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Xml => elink::records_to_xml(records)?,
        OutputFormat::Json => serde_json::to_string_pretty(records)?,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.source_config()?;
    info!(host = %config.hostname, "importing from DSpace");

    let transport = HttpTransport::new(&config)?;
    let importer = Importer::new(transport, &config);

    let records = match (&cli.id, &cli.collection) {
        (Some(id), _) => match importer.import_item(id) {
            Ok(record) => vec![record],
            Err(ImportError::NotFound { .. }) => {
                error!(%id, "ID number was not found");
                process::exit(EXIT_NOT_FOUND);
            },
            Err(ImportError::Unavailable { .. }) => {
                error!(%id, "ID number is not accessible");
                process::exit(EXIT_UNAVAILABLE);
            },
            Err(e) => return Err(e).with_context(|| format!("importing item {id}")),
        },
        (None, Some(collection)) => {
            importer
                .import_collection(collection)
                .with_context(|| format!("importing collection {collection}"))?
                .records
        },
        (None, None) => bail!("Item or Collection ID is required"),
    };

    println!("{}", render(&records, cli.format)?);
    Ok(())
}
