//! bibcite command line interface
//!
//! Formats bibliographies and citations from BibTeX or RIS files, converts
//! between the two formats, and resolves DOIs / ISBNs to metadata.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bibcite_core::{
    export, import_auto, BibliographyRequest, CitationEngine, CiteItem, CiteRequest, EngineConfig,
    ExportFormat, ExportOptions, ImportReport, StyleId,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(name = "bibcite")]
#[command(about = "Format citations, convert BibTeX/RIS and look up DOIs or ISBNs")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to <config dir>/bibcite/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Format the bibliography of a BibTeX or RIS file
    Format {
        /// Input file
        file: PathBuf,

        /// Style id, e.g. apa7, ieee
        #[arg(short, long, default_value = "apa7")]
        style: String,

        /// Emit HTML instead of plain text
        #[arg(long)]
        html: bool,

        /// Reference ids in order of first citation (numeric styles)
        #[arg(long, value_delimiter = ',')]
        order: Vec<String>,
    },

    /// Render an in-text citation for references in a file
    Cite {
        /// Input file
        file: PathBuf,

        /// Reference ids to cite
        #[arg(required = true)]
        ids: Vec<String>,

        #[arg(short, long, default_value = "apa7")]
        style: String,

        /// Page or other pinpoint, applied to the first reference
        #[arg(long)]
        locator: Option<String>,

        /// Note number for footnote styles
        #[arg(long)]
        note: Option<u32>,
    },

    /// Convert a BibTeX or RIS file
    Convert {
        /// Input file
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum)]
        to: Target,

        /// Leave abstracts out of the output
        #[arg(long)]
        no_abstract: bool,
    },

    /// Look up a DOI, ISBN or free-text query
    Lookup {
        /// DOI, ISBN or bibliographic query
        input: String,
    },

    /// List the built-in style ids
    Styles,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Target {
    Bibtex,
    Ris,
}

impl From<Target> for ExportFormat {
    fn from(target: Target) -> Self {
        match target {
            Target::Bibtex => ExportFormat::BibTeX,
            Target::Ris => ExportFormat::Ris,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bibcite=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, bibcite_core::ConfigurationError> {
    match path {
        Some(path) => EngineConfig::load(path),
        None => EngineConfig::load_or_default(),
    }
}

fn read_references(path: &Path) -> Result<ImportReport, std::io::Error> {
    let content = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = content.len(), "Read input");
    Ok(import_auto(&content))
}

fn run(cli: Cli) -> CliResult {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Format {
            file,
            style,
            html,
            order,
        } => {
            let report = read_references(&file)?;
            let html = html || config.render.html_output;
            let engine = CitationEngine::new(config);
            let scope = file.display().to_string();
            let bibliography = engine.format_bibliography(&BibliographyRequest {
                scope: &scope,
                style: &style,
                references: &report.references,
                citation_order: (!order.is_empty()).then_some(order.as_slice()),
            })?;
            if html {
                println!("{}", bibliography.to_html());
            } else {
                println!("{}", bibliography.to_plain());
            }
        }
        Commands::Cite {
            file,
            ids,
            style,
            locator,
            note,
        } => {
            let report = read_references(&file)?;
            let mut items: Vec<CiteItem> = ids.into_iter().map(CiteItem::new).collect();
            if let (Some(locator), Some(first)) = (locator, items.first_mut()) {
                first.locator = Some(locator);
            }
            let engine = CitationEngine::new(config);
            let scope = file.display().to_string();
            let citation = engine.cite(&CiteRequest {
                scope: &scope,
                style: &style,
                references: &report.references,
                citation_order: None,
                items: &items,
                note_number: note,
            })?;
            println!("{}", citation.text);
            if let Some(note) = citation.note {
                println!("{}", note);
            }
        }
        Commands::Convert {
            file,
            to,
            no_abstract,
        } => {
            let report = read_references(&file)?;
            let options = ExportOptions {
                include_abstract: !no_abstract,
                ..ExportOptions::default()
            };
            let exported = export(&report.references, to.into(), &options);
            print!("{}", exported.text);
        }
        Commands::Lookup { input } => lookup(&input, config)?,
        Commands::Styles => {
            for id in StyleId::all() {
                println!("{}", id);
            }
        }
    }

    Ok(())
}

fn lookup(input: &str, config: EngineConfig) -> CliResult {
    use bibcite_core::{HttpClient, LookupOutcome, LookupService};
    use tokio_util::sync::CancellationToken;

    let client = HttpClient::new(&config.lookup)?;
    let service = LookupService::new(client, config.lookup);
    let cancel = CancellationToken::new();

    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(service.lookup(input, &cancel))?;

    let json = match outcome {
        LookupOutcome::Record(record) => serde_json::to_string_pretty(&record)?,
        LookupOutcome::Candidates(candidates) => serde_json::to_string_pretty(&candidates)?,
    };
    println!("{}", json);
    Ok(())
}
