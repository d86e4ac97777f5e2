//! CLI binary: `docling-setup`.
//!
//! Reads `requirements.txt`, installs what it lists, and smoke-tests the
//! engine. Exits 0 only if every step succeeds.

use anyhow::Result;
use clap::Parser;
use docling_json::setup::{
    run_setup, CommandInstaller, CommandSmokeTest, CommandSpec, Installer, PdfiumInstaller,
    PdfiumSmokeTest, SmokeTest,
};
use docling_json::{SetupConfig, SetupError};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Download the PDFium build pinned in ./requirements.txt
  docling-setup

  # Delegate to pip instead and check the import afterwards
  docling-setup --install-cmd "pip install -r" --check-cmd 'python -c "import docling"'

MANIFEST:
  pip-style lines; `pdfium==<chromium build>` selects the engine release.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Use an existing libpdfium for the smoke test
  PDFIUM_AUTO_CACHE_DIR   Override the download cache root
"#;

/// Install the PDF engine and smoke-test it.
#[derive(Parser, Debug)]
#[command(
    name = "docling-setup",
    version,
    about = "Install the PDF engine listed in requirements.txt and smoke-test it",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Dependency manifest.
    #[arg(long, env = "DOCLING_MANIFEST", default_value = "requirements.txt")]
    manifest: PathBuf,

    /// External package manager command line, run through the shell; the
    /// manifest path is appended.
    #[arg(long, env = "DOCLING_INSTALL_CMD")]
    install_cmd: Option<String>,

    /// Shell command line whose zero exit status proves the install works.
    #[arg(long, env = "DOCLING_CHECK_CMD")]
    check_cmd: Option<String>,

    /// Cache root for downloaded engine builds.
    #[arg(long, env = "PDFIUM_AUTO_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCLING_VERBOSE")]
    verbose: bool,

    /// Suppress everything except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mut builder = SetupConfig::builder().manifest_path(&cli.manifest);
    if let Some(ref dir) = cli.cache_dir {
        builder = builder.cache_dir(dir);
    }
    let config = builder.build();

    let say = |line: String| {
        if !cli.quiet {
            println!("{line}");
        }
    };

    say(format!("{} {}", cyan("◆"), bold("[SETUP] Setting up the PDF engine for docling-parser")));
    say("=".repeat(50));

    let smoke = match build_smoke_test(&cli) {
        Ok(smoke) => smoke,
        Err(e) => {
            eprintln!("{} [SETUP] {e}", red("✗"));
            return Ok(ExitCode::FAILURE);
        }
    };
    let (installer, download_bar) = match build_installer(&cli, &config) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("{} [SETUP] {e}", red("✗"));
            return Ok(ExitCode::FAILURE);
        }
    };

    say(format!("  [SETUP] Installing dependencies via {}…", installer.describe()));

    let result = run_setup(&config, installer.as_ref(), smoke.as_ref());
    if let Some(bar) = download_bar {
        bar.finish_and_clear();
    }

    match result {
        Ok(report) => {
            say(format!("{} [SETUP] Dependencies installed successfully!", green("✓")));
            say("  [SETUP] Installed packages:".to_string());
            for item in &report.receipt.installed {
                say(format!("     - {item}"));
            }
            say(format!("{} [SETUP] Engine import successful!", green("✓")));
            say("=".repeat(50));
            say(format!("{} [SETUP] Setup completed successfully!", green("✔")));
            say("  [SETUP] You can now run: docling-parser <pdf_path>".to_string());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{} [SETUP] {e}", red("✗"));
            if let SetupError::ImportFailed(_) = e {
                eprintln!("  [SETUP] Try running: docling-setup --verbose");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// The install step plus the progress bar it reports to, if any.
fn build_installer(
    cli: &Cli,
    config: &SetupConfig,
) -> Result<(Box<dyn Installer>, Option<ProgressBar>), SetupError> {
    if let Some(ref line) = cli.install_cmd {
        let spec = CommandSpec::parse(line)
            .ok_or_else(|| SetupError::InstallFailed("--install-cmd is empty".into()))?;
        return Ok((Box::new(CommandInstaller::new(spec)), None));
    }

    let installer = PdfiumInstaller::new(config.cache_dir.clone());
    if cli.quiet {
        return Ok((Box::new(installer), None));
    }

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    bar.set_prefix("PDF engine");
    bar.enable_steady_tick(Duration::from_millis(80));

    let handle = bar.clone();
    let installer = installer.with_progress(Box::new(move |downloaded, total| {
        if let Some(t) = total {
            if handle.length().unwrap_or(0) != t {
                handle.set_length(t);
            }
        }
        handle.set_position(downloaded);
    }));

    Ok((Box::new(installer), Some(bar)))
}

fn build_smoke_test(cli: &Cli) -> Result<Box<dyn SmokeTest>, SetupError> {
    match cli.check_cmd {
        Some(ref line) => {
            let spec = CommandSpec::parse(line)
                .ok_or_else(|| SetupError::ImportFailed("--check-cmd is empty".into()))?;
            Ok(Box::new(CommandSmokeTest::new(spec)))
        }
        None => Ok(Box::new(PdfiumSmokeTest::default())),
    }
}
