//! End-to-end tests against a real PDFium library.
//!
//! Gated behind `E2E_ENABLED` because they need libpdfium, either on
//! `PDFIUM_LIB_PATH`, in the docling-setup cache, or on the system path.
//!
//! Run with:
//!   docling-setup && E2E_ENABLED=1 cargo test --test e2e -- --nocapture

use docling_json::pipeline::extract::bind_engine;
use docling_json::{parse_pdf, try_parse_pdf, PageSelection, ParseOutcome, ParserConfig};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};

macro_rules! e2e_skip_unless_enabled {
    () => {
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP: set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    };
}

/// Write a two-page PDF, each page a numbered heading over one sentence.
fn write_fixture(dir: &Path) -> PathBuf {
    let pdfium = bind_engine(None).expect("PDFium must be installed for e2e tests");
    let mut document = pdfium.create_new_pdf().unwrap();
    let font = document.fonts_mut().helvetica();

    let lines: [&[&str]; 2] = [
        &["1.1 Scope", "This report covers the first quarter."],
        &["2.1 Results", "Revenue grew in every region."],
    ];
    for page_lines in lines {
        let mut page = document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::a4())
            .unwrap();
        let mut y = 750.0;
        for line in page_lines {
            page.objects_mut()
                .create_text_object(
                    PdfPoints::new(72.0),
                    PdfPoints::new(y),
                    line,
                    font,
                    PdfPoints::new(12.0),
                )
                .unwrap();
            y -= 40.0;
        }
    }

    let path = dir.join("fixture.pdf");
    document.save_to_file(&path).unwrap();
    path
}

#[test]
fn parses_generated_pdf() {
    e2e_skip_unless_enabled!();
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path());

    let doc = try_parse_pdf(&path, &ParserConfig::default()).unwrap();
    println!("{}", doc.content);

    assert_eq!(doc.metadata.pages, 2);
    assert!(doc.content.contains("Revenue grew"), "{}", doc.content);
    assert_eq!(doc.metadata.word_count, doc.content.split_whitespace().count());
    assert!(doc.tables.is_empty());
    assert!(!doc.structure.paragraphs.is_empty());
}

#[test]
fn page_selection_limits_content_not_page_count() {
    e2e_skip_unless_enabled!();
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path());

    let config = ParserConfig::builder()
        .pages(PageSelection::Single(2))
        .build()
        .unwrap();
    let doc = try_parse_pdf(&path, &config).unwrap();

    assert_eq!(doc.metadata.pages, 2);
    assert!(doc.content.contains("Revenue"));
    assert!(!doc.content.contains("first quarter"));
}

#[test]
fn non_pdf_file_is_a_parse_failure() {
    e2e_skip_unless_enabled!();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.pdf");
    std::fs::write(&path, "just text").unwrap();

    match parse_pdf(&path, &ParserConfig::default()) {
        ParseOutcome::Failed { error } => {
            assert!(error.starts_with("Docling parsing failed: "), "{error}")
        }
        ParseOutcome::Parsed(_) => panic!("plain text parsed as PDF"),
    }
}
