//! CLI binary: `docling-parser <pdf_path>`.
//!
//! Prints the parse outcome as pretty JSON on stdout and exits 0 whether or
//! not parsing succeeded; failures live in the JSON `error` field. The only
//! non-zero exits are a bad command line and a missing PDFium engine.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use docling_json::{try_parse_pdf, PageSelection, PageSeparator, ParseError, ParseOutcome, ParserConfig};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: docling-parser <pdf_path>";

const AFTER_HELP: &str = r#"EXAMPLES:
  # Parse a PDF to JSON
  docling-parser report.pdf > report.json

  # First three pages, HTML comments between pages
  docling-parser --pages 1-3 --separator comment report.pdf

OUTPUT:
  Success: {"content", "metadata", "tables", "images", "structure"}
  Failure: {"error": "File not found: <path>"}
           {"error": "Docling parsing failed: <message>"}

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to an existing libpdfium
  PDFIUM_AUTO_CACHE_DIR   Cache root used by docling-setup
  RUST_LOG                Log filter (logs go to stderr)

SETUP:
  Run `docling-setup` once to download the PDFium engine.
"#;

/// Parse a PDF into Docling-shaped JSON.
#[derive(Parser, Debug)]
#[command(
    name = "docling-parser",
    version,
    about = "Parse a PDF into Docling-shaped JSON",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the PDF file.
    pdf_path: PathBuf,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "DOCLING_PASSWORD")]
    password: Option<String>,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "DOCLING_PAGES", default_value = "all")]
    pages: String,

    /// Page separator: none, hr, comment, or custom string.
    #[arg(long, env = "DOCLING_SEPARATOR", default_value = "none")]
    separator: String,

    /// Explicit PDFium shared library.
    #[arg(long, env = "DOCLING_PDFIUM_LIB")]
    pdfium_lib: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs on stderr.
    #[arg(short, long, env = "DOCLING_VERBOSE")]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => {
            println!("{USAGE}");
            return Ok(ExitCode::FAILURE);
        }
    };

    // ── Logging setup ────────────────────────────────────────────────────
    // stdout carries only JSON; logs stay on stderr and are quiet by default.
    let filter = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            println!("{USAGE}");
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let outcome: ParseOutcome = match try_parse_pdf(&cli.pdf_path, &config) {
        Ok(doc) => doc.into(),
        Err(ParseError::EngineUnavailable(reason)) => {
            println!("ERROR: PDFium not installed. Run: docling-setup");
            eprintln!("{reason}");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => e.into_outcome(),
    };

    println!(
        "{}",
        outcome.to_json_pretty().context("Failed to serialise output")?
    );
    Ok(ExitCode::SUCCESS)
}

/// Map CLI args to `ParserConfig`.
fn build_config(cli: &Cli) -> Result<ParserConfig, ParseError> {
    let pages: PageSelection = cli.pages.parse()?;

    let mut builder = ParserConfig::builder()
        .pages(pages)
        .page_separator(PageSeparator::from(cli.separator.as_str()));

    if let Some(ref password) = cli.password {
        builder = builder.password(password);
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.library_path(lib);
    }

    builder.build()
}
