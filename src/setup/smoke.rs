//! Post-install smoke tests: prove the engine actually loads.

use super::installer::{CommandSpec, InstallReceipt};
use crate::error::SetupError;
use std::path::PathBuf;
use tracing::debug;

pub trait SmokeTest {
    fn run(&self, receipt: &InstallReceipt) -> Result<(), SetupError>;
}

/// Binds PDFium and creates an empty document in memory.
///
/// The library comes from the install receipt, then `library_path`, then
/// whatever [`pdfium_auto::locate_library`] finds.
#[derive(Debug, Clone, Default)]
pub struct PdfiumSmokeTest {
    pub library_path: Option<PathBuf>,
}

impl SmokeTest for PdfiumSmokeTest {
    fn run(&self, receipt: &InstallReceipt) -> Result<(), SetupError> {
        let path = receipt
            .library_path
            .clone()
            .or_else(|| self.library_path.clone())
            .or_else(pdfium_auto::locate_library)
            .ok_or_else(|| {
                SetupError::ImportFailed("no PDFium library installed or on PDFIUM_LIB_PATH".into())
            })?;

        debug!("Binding PDFium from {}", path.display());
        let pdfium = pdfium_auto::bind_from_path(&path)?;
        let document = pdfium
            .create_new_pdf()
            .map_err(|e| SetupError::ImportFailed(format!("PDFium loaded but unusable: {e}")))?;
        debug!("Empty document has {} pages", document.pages().len());
        Ok(())
    }
}

/// Runs a shell command line, e.g. `python -c "import docling"`; exit 0
/// means the import works.
#[derive(Debug, Clone)]
pub struct CommandSmokeTest {
    spec: CommandSpec,
}

impl CommandSmokeTest {
    pub fn new(spec: CommandSpec) -> Self {
        Self { spec }
    }
}

impl SmokeTest for CommandSmokeTest {
    fn run(&self, _receipt: &InstallReceipt) -> Result<(), SetupError> {
        let status = self
            .spec
            .command(&[])
            .status()
            .map_err(|e| SetupError::ImportFailed(format!("could not run '{}': {e}", self.spec)))?;
        if status.success() {
            Ok(())
        } else {
            Err(SetupError::ImportFailed(format!(
                "'{}' exited with {}",
                self.spec, status
            )))
        }
    }
}
