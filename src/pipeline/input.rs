//! Input resolution: validate a user-supplied path before the engine sees it.
//!
//! Only existence is checked here. Anything else wrong with the file
//! (permissions, not a PDF, truncated) is for the engine to report, so it
//! surfaces as a conversion failure rather than a missing file.

use crate::error::ParseError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve a local file path, failing with [`ParseError::FileNotFound`] if absent.
pub fn resolve_local(path: impl AsRef<Path>) -> Result<PathBuf, ParseError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ParseError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path.to_path_buf())
}
