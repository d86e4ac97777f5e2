//! Error types for the docling-json library.
//!
//! Two error types reflect the two programs in this crate:
//!
//! * [`ParseError`]: anything that stops a single PDF from being normalized.
//!   It never escapes the parser binary as an exit code; it is folded into
//!   the `{"error": …}` JSON body by [`ParseError::into_outcome`].
//!
//! * [`SetupError`]: terminal failures of the installer. The setup binary
//!   prints them and exits with status 1.

use crate::document::ParseOutcome;
use std::path::PathBuf;
use thiserror::Error;

/// Prefix of every conversion failure message in the JSON body.
///
/// Consumers of the parser output match on this string, so it stays fixed
/// regardless of which engine backs the conversion.
pub const PARSE_FAILED_PREFIX: &str = "Docling parsing failed";

/// All failures of a single parse.
#[derive(Debug, Error)]
pub enum ParseError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input path does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// PDFium could not be bound at all.
    #[error("PDFium engine unavailable: {0}")]
    EngineUnavailable(String),

    /// PDF requires a password but none was provided.
    #[error("PDF '{}' is encrypted and requires a password", path.display())]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{}'", path.display())]
    WrongPassword { path: PathBuf },

    /// The engine refused to load the file.
    #[error("PDF '{}' could not be loaded: {detail}", path.display())]
    CorruptPdf { path: PathBuf, detail: String },

    /// Loading succeeded but reading content from the document failed.
    #[error("Extraction failed on page {page}: {detail}")]
    Extraction { page: usize, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ParseError {
    /// Message placed in the `error` field of the JSON output.
    pub fn json_message(&self) -> String {
        match self {
            ParseError::FileNotFound { .. } => self.to_string(),
            other => format!("{PARSE_FAILED_PREFIX}: {other}"),
        }
    }

    pub fn into_outcome(self) -> ParseOutcome {
        ParseOutcome::Failed {
            error: self.json_message(),
        }
    }
}

/// Terminal failures of the dependency installer.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The manifest file is absent; nothing was installed.
    #[error("{} not found!", path.display())]
    MissingManifest { path: PathBuf },

    /// A manifest line could not be understood.
    #[error("{}:{line}: {detail}", path.display())]
    InvalidManifest {
        path: PathBuf,
        line: usize,
        detail: String,
    },

    /// The install step failed or exited non-zero.
    #[error("Failed to install dependencies: {0}")]
    InstallFailed(String),

    /// The post-install smoke test could not load the engine.
    #[error("Engine import failed: {0}")]
    ImportFailed(String),
}

impl From<pdfium_auto::PdfiumAutoError> for SetupError {
    fn from(e: pdfium_auto::PdfiumAutoError) -> Self {
        match e {
            pdfium_auto::PdfiumAutoError::Bind { .. } => SetupError::ImportFailed(e.to_string()),
            other => SetupError::InstallFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_message_is_bare() {
        let e = ParseError::FileNotFound {
            path: PathBuf::from("/tmp/missing.pdf"),
        };
        assert_eq!(e.json_message(), "File not found: /tmp/missing.pdf");
    }

    #[test]
    fn conversion_errors_are_prefixed() {
        let e = ParseError::CorruptPdf {
            path: PathBuf::from("a.pdf"),
            detail: "bad xref".into(),
        };
        let msg = e.json_message();
        assert!(msg.starts_with("Docling parsing failed: "), "got: {msg}");
        assert!(msg.contains("bad xref"));
    }

    #[test]
    fn outcome_carries_only_error() {
        let outcome = ParseError::Internal("boom".into()).into_outcome();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "error": "Docling parsing failed: Internal error: boom" })
        );
    }

    #[test]
    fn missing_manifest_display() {
        let e = SetupError::MissingManifest {
            path: PathBuf::from("requirements.txt"),
        };
        assert_eq!(e.to_string(), "requirements.txt not found!");
    }

    #[test]
    fn bind_failures_become_import_failures() {
        let e: SetupError = pdfium_auto::PdfiumAutoError::Bind {
            path: PathBuf::from("/x/libpdfium.so"),
            reason: "no such file".into(),
        }
        .into();
        assert!(matches!(e, SetupError::ImportFailed(_)));

        let e: SetupError = pdfium_auto::PdfiumAutoError::Download("HTTP 404".into()).into();
        assert!(matches!(e, SetupError::InstallFailed(_)));
    }
}
