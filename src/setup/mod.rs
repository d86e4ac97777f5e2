//! Dependency installer: manifest check, install step, smoke test.
//!
//! [`run_setup`] is a straight line with no rollback: the first failure is
//! terminal and is returned to the caller.
//!
//! ```rust,no_run
//! use docling_json::setup::{run_setup, PdfiumInstaller, PdfiumSmokeTest};
//! use docling_json::SetupConfig;
//!
//! let config = SetupConfig::default();
//! let report = run_setup(&config, &PdfiumInstaller::default(), &PdfiumSmokeTest::default())
//!     .expect("setup failed");
//! println!("installed: {:?}", report.receipt.installed);
//! ```

mod installer;
mod manifest;
mod smoke;

pub use installer::{
    CommandInstaller, CommandSpec, InstallReceipt, Installer, PdfiumInstaller, ProgressFn,
};
pub use manifest::{Manifest, Requirement, PDFIUM_REQUIREMENT};
pub use smoke::{CommandSmokeTest, PdfiumSmokeTest, SmokeTest};

use crate::config::SetupConfig;
use crate::error::SetupError;
use tracing::info;

/// Result of a successful setup run.
#[derive(Debug, Clone)]
pub struct SetupReport {
    pub manifest: Manifest,
    pub receipt: InstallReceipt,
}

/// Check the manifest, install, then smoke-test.
///
/// A missing manifest fails before `installer` is invoked.
pub fn run_setup(
    config: &SetupConfig,
    installer: &dyn Installer,
    smoke: &dyn SmokeTest,
) -> Result<SetupReport, SetupError> {
    let manifest = Manifest::load(&config.manifest_path)?;
    info!(
        "Manifest {} lists {} entries",
        manifest.path.display(),
        manifest.listed().len()
    );

    info!("Installing via {}", installer.describe());
    let receipt = installer.install(&manifest)?;

    smoke.run(&receipt)?;
    info!("Smoke test passed");

    Ok(SetupReport { manifest, receipt })
}
