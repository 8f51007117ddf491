//! Sharelab command line: extract lab results from redacted report text.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use sharelab_lib::config::{EngineConfig, APP_NAME, APP_VERSION};
use sharelab_lib::pipeline::labs::SynonymDictionary;
use sharelab_lib::{init_tracing, LabEngine, LabError, ReportResult, TokenPage};

#[derive(Parser)]
#[command(
    name = "sharelab",
    version,
    about = "Extract structured lab results from redacted report text"
)]
struct Cli {
    /// Redacted report text (UTF-8).
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// JSON array of pages of positioned tokens from the PDF text layer.
    #[arg(long, value_name = "FILE")]
    tokens: Option<PathBuf>,

    /// JSON engine configuration; missing fields take their defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write the structured record to this file.
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// What to print on stdout.
    #[arg(long, value_enum, default_value = "all")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Professional,
    Patient,
    Json,
    All,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();
    tracing::info!("{} v{}", APP_NAME, APP_VERSION);

    if let Err(error) = run(&cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), LabError> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let text = std::fs::read_to_string(&cli.input)?;
    let pages = cli.tokens.as_deref().map(load_tokens).transpose()?;

    let engine = LabEngine::new(config, SynonymDictionary::builtin());
    let report = engine.extract(&text, pages.as_deref());

    if let Some(path) = &cli.json {
        std::fs::write(path, report.to_json()?)?;
        tracing::info!(path = %path.display(), "Wrote JSON record");
    }
    print_report(&report, cli.format)?;
    Ok(())
}

fn load_tokens(path: &Path) -> Result<Vec<TokenPage>, LabError> {
    let json = std::fs::read_to_string(path)?;
    let pages: Vec<TokenPage> = serde_json::from_str(&json)?;
    tracing::debug!(pages = pages.len(), "Loaded positioned tokens");
    Ok(pages)
}

fn print_report(report: &ReportResult, format: OutputFormat) -> Result<(), LabError> {
    match format {
        OutputFormat::Professional => println!("{}", report.professional_summary),
        OutputFormat::Patient => {
            for line in &report.patient_summary {
                println!("{line}");
            }
        }
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::All => {
            println!("{}", report.professional_summary);
            println!();
            for line in &report.patient_summary {
                println!("{line}");
            }
        }
    }
    Ok(())
}
