//! PDFium backend stages.
//!
//! ```text
//! input ──▶ extract ──▶ postprocess ──▶ layout ──▶ postprocess
//! (path)    (pdfium)    (page text)     (blocks)   (markdown)
//! ```
//!
//! 1. [`input`]: check the user-supplied path exists
//! 2. [`extract`]: bind PDFium, load the document, read metadata,
//!    page text and image objects
//! 3. [`postprocess`]: normalise raw page text, later tidy the export
//! 4. [`layout`]: segment page text into headings, paragraphs and lists

pub mod extract;
pub mod input;
pub mod layout;
pub mod postprocess;
