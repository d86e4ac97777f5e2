//! # docling-json
//!
//! Normalize PDF documents into Docling-shaped JSON.
//!
//! The crate is a thin shim: PDFium (through `pdfium-render`) does the PDF
//! work, and this crate probes what the engine exposes and shapes it into a
//! fixed schema of markdown content, metadata, tables, images and
//! heading/paragraph/list structure. A companion installer fetches the
//! engine and smoke-tests it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! path
//!  │
//!  ├─ 1. Input      missing file → {"error": "File not found: …"}
//!  ├─ 2. Engine     bind PDFium (explicit path, cache, system library)
//!  ├─ 3. Extract    metadata, page text, image objects
//!  ├─ 4. Layout     page text → headings / paragraphs / lists → markdown
//!  └─ 5. Normalize  optional capabilities → fixed JSON schema
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docling_json::{parse_pdf, ParserConfig};
//!
//! let outcome = parse_pdf("document.pdf", &ParserConfig::default());
//! println!("{}", outcome.to_json_pretty().unwrap());
//! ```
//!
//! Any engine can be plugged in by implementing [`DocumentConverter`]; see
//! [`parse_with`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docling-parser` and `docling-setup` binaries |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod setup;
pub mod source;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PageSelection, PageSeparator, ParserConfig, ParserConfigBuilder, SetupConfig};
pub use convert::{
    normalize, parse_pdf, parse_pdf_async, parse_pdf_bytes, parse_with, try_parse_pdf,
    try_parse_with,
};
pub use document::{ParseOutcome, ParsedDocument};
pub use error::{ParseError, SetupError, PARSE_FAILED_PREFIX};
pub use pipeline::extract::{ExtractedDocument, PdfiumConverter};
pub use setup::run_setup;
pub use source::{ConvertedDocument, DocElement, DocImage, DocTable, DocumentConverter};
