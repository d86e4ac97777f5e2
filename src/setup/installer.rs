//! Install steps.
//!
//! [`PdfiumInstaller`] fetches the engine build named by the manifest.
//! [`CommandInstaller`] hands the manifest to an external package manager,
//! e.g. `pip install -r requirements.txt`.

use super::manifest::Manifest;
use crate::error::SetupError;
use std::ffi::OsStr;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info};

/// Download progress: `(bytes_downloaded, total_bytes_if_known)`.
pub type ProgressFn = Box<dyn Fn(u64, Option<u64>)>;

/// What an install step produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReceipt {
    /// Engine library on disk, when the step installed one.
    pub library_path: Option<PathBuf>,
    /// Human-readable names of what was installed.
    pub installed: Vec<String>,
}

pub trait Installer {
    fn install(&self, manifest: &Manifest) -> Result<InstallReceipt, SetupError>;

    /// Short description for progress messages.
    fn describe(&self) -> String;
}

/// Installs the PDFium build pinned by the manifest into the local cache.
#[derive(Default)]
pub struct PdfiumInstaller {
    cache_dir: Option<PathBuf>,
    on_progress: Option<ProgressFn>,
}

impl PdfiumInstaller {
    pub fn new(cache_dir: Option<PathBuf>) -> Self {
        Self {
            cache_dir,
            on_progress: None,
        }
    }

    pub fn with_progress(mut self, on_progress: ProgressFn) -> Self {
        self.on_progress = Some(on_progress);
        self
    }
}

impl Installer for PdfiumInstaller {
    fn install(&self, manifest: &Manifest) -> Result<InstallReceipt, SetupError> {
        let release = manifest.pdfium_release()?;
        info!("Installing PDFium {}", release.version());

        let library_path = pdfium_auto::install(
            &release,
            self.cache_dir.as_deref(),
            self.on_progress.as_deref(),
        )?;

        Ok(InstallReceipt {
            library_path: Some(library_path),
            installed: vec![format!("pdfium {} (PDF engine)", release.version())],
        })
    }

    fn describe(&self) -> String {
        "PDFium engine download".to_string()
    }
}

/// A shell command line, run through `sh -c` (`cmd /C` on Windows).
///
/// Quoting, globs and `&&` behave as they do in the user's shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    line: String,
}

impl CommandSpec {
    /// `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        (!line.is_empty()).then(|| Self {
            line: line.to_string(),
        })
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    /// Build the shell invocation; `args` are passed as separate words after
    /// the command line, never re-parsed by the shell.
    pub(crate) fn command(&self, args: &[&OsStr]) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&self.line).args(args);
            cmd
        } else if args.is_empty() {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(&self.line);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c")
                .arg(format!("{} \"$@\"", self.line))
                .arg("sh")
                .args(args);
            cmd
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// Runs `<command line> <manifest path>` and requires exit status 0.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    spec: CommandSpec,
}

impl CommandInstaller {
    pub fn new(spec: CommandSpec) -> Self {
        Self { spec }
    }
}

impl Installer for CommandInstaller {
    fn install(&self, manifest: &Manifest) -> Result<InstallReceipt, SetupError> {
        let mut cmd = self.spec.command(&[manifest.path.as_os_str()]);
        debug!("Running {:?}", cmd);

        let status = cmd
            .status()
            .map_err(|e| SetupError::InstallFailed(format!("could not run '{}': {e}", self.spec)))?;
        if !status.success() {
            return Err(SetupError::InstallFailed(format!(
                "'{} {}' exited with {}",
                self.spec,
                manifest.path.display(),
                status
            )));
        }

        Ok(InstallReceipt {
            library_path: None,
            installed: manifest.listed(),
        })
    }

    fn describe(&self) -> String {
        format!("{} <manifest>", self.spec)
    }
}
