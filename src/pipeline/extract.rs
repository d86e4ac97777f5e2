//! PDFium backend: load a PDF and pull out everything the normalizer can use.
//!
//! `pdfium-render` documents borrow the `Pdfium` instance that opened them,
//! so extraction is eager: [`PdfiumConverter::convert`] walks the document
//! once and returns an owned [`ExtractedDocument`] with no ties to the engine.

use crate::config::{PageSeparator, ParserConfig};
use crate::error::ParseError;
use crate::pipeline::layout::{self, Block};
use crate::pipeline::postprocess;
use crate::source::{ConvertedDocument, DocElement, DocImage, DocumentConverter};
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Everything read from one PDF.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    pub markdown: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub page_count: usize,
    pub images: Vec<DocImage>,
    pub elements: Vec<DocElement>,
}

impl ConvertedDocument for ExtractedDocument {
    fn export_to_markdown(&self) -> Result<String, ParseError> {
        Ok(self.markdown.clone())
    }

    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    fn author(&self) -> Option<String> {
        self.author.clone()
    }

    fn page_count(&self) -> Option<usize> {
        Some(self.page_count)
    }

    fn images(&self) -> Option<Vec<DocImage>> {
        Some(self.images.clone())
    }

    fn elements(&self) -> Option<Vec<DocElement>> {
        Some(self.elements.clone())
    }

    // PDFium has no table model; `tables()` keeps the default.
}

/// [`DocumentConverter`] backed by a bound PDFium library.
pub struct PdfiumConverter {
    pdfium: Pdfium,
    config: ParserConfig,
}

impl PdfiumConverter {
    /// Bind the engine as described by [`bind_engine`].
    pub fn bind(config: ParserConfig) -> Result<Self, ParseError> {
        let pdfium = bind_engine(config.library_path.as_deref())?;
        Ok(Self::with_pdfium(pdfium, config))
    }

    pub fn with_pdfium(pdfium: Pdfium, config: ParserConfig) -> Self {
        Self { pdfium, config }
    }
}

impl DocumentConverter for PdfiumConverter {
    type Document = ExtractedDocument;

    fn convert(&self, path: &Path) -> Result<ExtractedDocument, ParseError> {
        let password = self.config.password.as_deref();
        let document = self
            .pdfium
            .load_pdf_from_file(path, password)
            .map_err(|e| load_error(path, password, e))?;

        let metadata = document.metadata();
        let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
            metadata.get(tag).and_then(|t| {
                let v = t.value().trim().to_string();
                if v.is_empty() {
                    None
                } else {
                    Some(v)
                }
            })
        };

        let pages = document.pages();
        let page_count = pages.len() as usize;
        info!("PDF loaded: {} pages", page_count);

        let selected = self.config.pages.to_indices(page_count);
        if selected.is_empty() && page_count > 0 {
            warn!("Page selection {:?} matches no page of {}", self.config.pages, page_count);
        }

        let mut extracted = ExtractedDocument {
            title: get_meta(PdfDocumentMetadataTagType::Title),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            page_count,
            ..Default::default()
        };
        let mut page_markdown: Vec<(usize, String)> = Vec::with_capacity(selected.len());

        for (idx, page) in pages.iter().enumerate() {
            if selected.binary_search(&idx).is_err() {
                continue;
            }

            let text = page.text().map_err(|e| ParseError::Extraction {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?;
            let blocks = layout::segment_page(&postprocess::clean_page_text(&text.all()));
            extracted
                .elements
                .extend(blocks.iter().map(Block::to_element));

            let image_count = page
                .objects()
                .iter()
                .filter(|object| object.object_type() == PdfPageObjectType::Image)
                .count();
            extracted
                .images
                .extend(std::iter::repeat_with(DocImage::default).take(image_count));

            debug!(
                "Page {}: {} blocks, {} images",
                idx + 1,
                blocks.len(),
                image_count
            );
            page_markdown.push((idx + 1, layout::render_markdown(&blocks)));
        }

        extracted.markdown = assemble_markdown(&page_markdown, &self.config.page_separator);
        Ok(extracted)
    }
}

/// Bind PDFium, most specific source first:
///
/// 1. `explicit` library path (no fallback if it fails)
/// 2. `PDFIUM_LIB_PATH`, then the installer's cache (last recorded install,
///    else the newest cached build)
/// 3. the system library search path
pub fn bind_engine(explicit: Option<&Path>) -> Result<Pdfium, ParseError> {
    if let Some(path) = explicit {
        return pdfium_auto::bind_from_path(path)
            .map_err(|e| ParseError::EngineUnavailable(e.to_string()));
    }

    if let Some(path) = pdfium_auto::locate_library() {
        match pdfium_auto::bind_from_path(&path) {
            Ok(pdfium) => {
                debug!("Bound PDFium from {}", path.display());
                return Ok(pdfium);
            }
            Err(e) => warn!("{e}; trying the system library"),
        }
    }

    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| {
            ParseError::EngineUnavailable(format!(
                "no PDFium library found ({e}). Run docling-setup or set PDFIUM_LIB_PATH"
            ))
        })
}

fn load_error(path: &Path, password: Option<&str>, e: PdfiumError) -> ParseError {
    let err_str = format!("{:?}", e);
    if err_str.contains("Password") || err_str.contains("password") {
        if password.is_some() {
            ParseError::WrongPassword {
                path: path.to_path_buf(),
            }
        } else {
            ParseError::PasswordRequired {
                path: path.to_path_buf(),
            }
        }
    } else {
        ParseError::CorruptPdf {
            path: path.to_path_buf(),
            detail: err_str,
        }
    }
}

/// Join per-page markdown, skipping pages with no text.
fn assemble_markdown(pages: &[(usize, String)], separator: &PageSeparator) -> String {
    let mut out = String::new();
    for (page_num, markdown) in pages.iter().filter(|(_, md)| !md.trim().is_empty()) {
        if !out.is_empty() {
            out.push_str(&separator.render(*page_num));
        }
        out.push_str(markdown);
    }
    postprocess::clean_markdown(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_skips_empty_pages() {
        let pages = vec![
            (1, "# One".to_string()),
            (2, "   ".to_string()),
            (3, "Three".to_string()),
        ];
        assert_eq!(
            assemble_markdown(&pages, &PageSeparator::Comment),
            "# One\n\n<!-- page 3 -->\n\nThree\n"
        );
    }

    #[test]
    fn assemble_empty_document_is_empty() {
        assert_eq!(assemble_markdown(&[], &PageSeparator::None), "");
    }

    #[test]
    fn extracted_document_reports_no_tables() {
        let doc = ExtractedDocument {
            markdown: "text\n".into(),
            page_count: 2,
            ..Default::default()
        };
        assert!(doc.tables().is_none());
        assert_eq!(doc.page_count(), Some(2));
        assert_eq!(doc.export_to_markdown().unwrap(), "text\n");
    }

    #[test]
    fn explicit_missing_library_is_engine_unavailable() {
        let err = bind_engine(Some(Path::new("/nonexistent/libpdfium.so"))).unwrap_err();
        assert!(matches!(err, ParseError::EngineUnavailable(_)));
    }
}
