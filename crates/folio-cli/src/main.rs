//! Folio — turn extracted documents into chapter-structured JSON.

use std::path::PathBuf;

use anyhow::Context;
use folio_core::ParseConfig;
use folio_runtime::Orchestrator;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, PartialEq)]
struct Args {
    title: Option<String>,
    files: Vec<PathBuf>,
    help: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" | "help" => parsed.help = true,
            "--title" | "-t" => match args.next() {
                Some(title) => parsed.title = Some(title),
                None => return Err("--title needs a value".to_string()),
            },
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("Unknown option: {}", flag));
            }
            _ => parsed.files.push(PathBuf::from(arg)),
        }
    }

    if !parsed.help && parsed.files.is_empty() {
        return Err("No input files".to_string());
    }
    Ok(parsed)
}

fn print_usage() {
    println!("Folio — document structure normalization");
    println!();
    println!("Usage: folio [--title <title>] <file>...");
    println!();
    println!("Inputs:");
    println!("  *.md, *.txt              Extracted directly");
    println!("  *.json                   Extraction dump (title, format, content, signals)");
    println!();
    println!("Options:");
    println!("  -t, --title <title>      Document title for every input");
    println!("  -h, --help               Show this help message");
    println!();
    println!("Environment:");
    println!("  FOLIO_MIN_WORDS_PER_CHAPTER, FOLIO_MAX_WORDS_PER_CHUNK,");
    println!("  FOLIO_HEADING_CONFIDENCE_FLOOR, FOLIO_TYPOGRAPHIC_STD_DEV_MULTIPLIER,");
    println!("  FOLIO_AVERAGE_READING_SPEED_WPM, FOLIO_WORKERS, RUST_LOG");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}. Use 'folio --help' for usage.", msg);
            std::process::exit(1);
        }
    };
    if args.help {
        print_usage();
        return Ok(());
    }

    // Configuration is validated before any file is read.
    let config = ParseConfig::from_env().context("Failed to load configuration")?;
    let orchestrator = match Orchestrator::new(&config) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut extractions = Vec::with_capacity(args.files.len());
    for path in &args.files {
        match folio_extract::extract_path(path) {
            Ok(mut extraction) => {
                if let Some(title) = &args.title {
                    extraction.title = Some(title.clone());
                }
                extractions.push(extraction);
            }
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }
    info!("Structuring {} document(s)", extractions.len());

    let output = orchestrator.parse_batch(extractions).await;
    let mut documents = Vec::with_capacity(output.documents.len());
    for (path, result) in args.files.iter().zip(output.documents) {
        match result {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                error!("Failed to structure {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }

    let json = serde_json::to_string_pretty(&documents).context("Failed to serialize documents")?;
    println!("{}", json);
    Ok(())
}
