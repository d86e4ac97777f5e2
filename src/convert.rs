//! Document-to-JSON normalizer and the parse entry points.
//!
//! Every entry point returns a [`ParseOutcome`]: the caller prints it as is.
//! A missing file is reported before any engine is touched; every other
//! failure is wrapped as a conversion failure.

use crate::config::ParserConfig;
use crate::document::{
    Heading, ImageSummary, ListBlock, Metadata, Paragraph, ParseOutcome, ParsedDocument,
    Structure, TableSummary,
};
use crate::error::ParseError;
use crate::pipeline::{extract::PdfiumConverter, input};
use crate::source::{ConvertedDocument, DocumentConverter, ElementKind};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Build the fixed schema from whatever `doc` exposes.
///
/// Missing capabilities become empty strings, zeros and empty lists.
pub fn normalize(doc: &impl ConvertedDocument) -> Result<ParsedDocument, ParseError> {
    let content = doc.export_to_markdown()?;

    let mut metadata = Metadata {
        title: doc.title().unwrap_or_default(),
        author: doc.author().unwrap_or_default(),
        pages: doc.page_count().unwrap_or(0),
        ..Default::default()
    };
    metadata.count_content(&content);

    let tables = doc
        .tables()
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, table)| TableSummary {
            index,
            content: table.content,
            rows: table.rows.unwrap_or(0),
            columns: table.columns.unwrap_or(0),
        })
        .collect();

    let images = doc
        .images()
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, image)| ImageSummary {
            index,
            description: image.description.unwrap_or_default(),
            caption: image.caption.unwrap_or_default(),
        })
        .collect();

    let mut structure = Structure::default();
    for element in doc.elements().unwrap_or_default() {
        let Some(kind) = element.label.as_deref().and_then(ElementKind::classify) else {
            continue;
        };
        let text = element.text.unwrap_or_default();
        match kind {
            ElementKind::Heading => structure.headings.push(Heading {
                text,
                level: element.level.unwrap_or(1),
            }),
            ElementKind::Paragraph => structure.paragraphs.push(Paragraph::new(text)),
            ElementKind::List => structure.lists.push(ListBlock::new(text)),
        }
    }

    Ok(ParsedDocument {
        content,
        metadata,
        tables,
        images,
        structure,
    })
}

/// Check `path`, convert it with `converter`, and normalize the result.
pub fn try_parse_with<C: DocumentConverter>(
    converter: &C,
    path: impl AsRef<Path>,
) -> Result<ParsedDocument, ParseError> {
    let path = input::resolve_local(path)?;
    let document = converter.convert(&path)?;
    normalize(&document)
}

/// [`try_parse_with`], folded into a printable outcome.
pub fn parse_with<C: DocumentConverter>(converter: &C, path: impl AsRef<Path>) -> ParseOutcome {
    match try_parse_with(converter, path) {
        Ok(doc) => doc.into(),
        Err(e) => e.into_outcome(),
    }
}

/// Parse a PDF with the PDFium backend.
///
/// The path is checked before the engine is bound, so a missing file is
/// reported even when PDFium is not installed.
pub fn try_parse_pdf(
    path: impl AsRef<Path>,
    config: &ParserConfig,
) -> Result<ParsedDocument, ParseError> {
    let start = Instant::now();
    let path = input::resolve_local(path)?;
    info!("Parsing {}", path.display());

    let converter = PdfiumConverter::bind(config.clone())?;
    let doc = try_parse_with(&converter, &path)?;

    debug!(
        "Parsed {} pages, {} words in {}ms",
        doc.metadata.pages,
        doc.metadata.word_count,
        start.elapsed().as_millis()
    );
    Ok(doc)
}

/// Parse a PDF with the PDFium backend and fold errors into the outcome.
pub fn parse_pdf(path: impl AsRef<Path>, config: &ParserConfig) -> ParseOutcome {
    match try_parse_pdf(path, config) {
        Ok(doc) => doc.into(),
        Err(e) => e.into_outcome(),
    }
}

/// Async wrapper around [`parse_pdf`].
///
/// PDFium calls block, so the parse runs on tokio's blocking pool.
pub async fn parse_pdf_async(path: impl AsRef<Path>, config: ParserConfig) -> ParseOutcome {
    let path = path.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || parse_pdf(&path, &config))
        .await
        .unwrap_or_else(|e| {
            ParseError::Internal(format!("Parse task panicked: {}", e)).into_outcome()
        })
}

/// Parse PDF bytes held in memory.
///
/// The bytes are written to a managed [`tempfile`] that is removed when the
/// parse returns.
pub fn parse_pdf_bytes(bytes: &[u8], config: &ParserConfig) -> ParseOutcome {
    let written = tempfile::NamedTempFile::new().and_then(|mut tmp| {
        tmp.write_all(bytes)?;
        tmp.flush()?;
        Ok(tmp)
    });
    match written {
        Ok(tmp) => parse_pdf(tmp.path(), config),
        Err(e) => ParseError::Internal(format!("tempfile: {e}")).into_outcome(),
    }
}
