//! Capabilities of a conversion result.
//!
//! A document engine exposes some subset of title, author, page count,
//! tables, images and labelled elements. Each is an optional capability on
//! [`ConvertedDocument`]; the defaults report "not available", and the
//! normalizer falls back to empty values for anything missing.

use crate::error::ParseError;
use std::path::Path;

/// Turns a file on disk into a conversion result.
pub trait DocumentConverter {
    type Document: ConvertedDocument;

    fn convert(&self, path: &Path) -> Result<Self::Document, ParseError>;
}

/// A conversion result, queried through optional capabilities.
pub trait ConvertedDocument {
    /// Markdown export of the document. Every engine must provide this.
    fn export_to_markdown(&self) -> Result<String, ParseError>;

    fn title(&self) -> Option<String> {
        None
    }

    fn author(&self) -> Option<String> {
        None
    }

    fn page_count(&self) -> Option<usize> {
        None
    }

    fn tables(&self) -> Option<Vec<DocTable>> {
        None
    }

    fn images(&self) -> Option<Vec<DocImage>> {
        None
    }

    fn elements(&self) -> Option<Vec<DocElement>> {
        None
    }
}

/// A table as reported by the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocTable {
    /// Textual rendering of the whole table.
    pub content: String,
    pub rows: Option<usize>,
    pub columns: Option<usize>,
}

/// A picture as reported by the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocImage {
    pub description: Option<String>,
    pub caption: Option<String>,
}

/// A labelled layout element, e.g. `section_heading` or `list_item`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocElement {
    pub label: Option<String>,
    pub text: Option<String>,
    pub level: Option<u32>,
}

impl DocElement {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            text: Some(text.into()),
            level: None,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }
}

/// Which structure bucket a label falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Heading,
    Paragraph,
    List,
}

impl ElementKind {
    /// Case-insensitive substring match, checked in heading, paragraph,
    /// list order. Empty labels classify as nothing.
    pub fn classify(label: &str) -> Option<Self> {
        if label.is_empty() {
            return None;
        }
        let label = label.to_lowercase();
        if label.contains("heading") {
            Some(ElementKind::Heading)
        } else if label.contains("paragraph") {
            Some(ElementKind::Paragraph)
        } else if label.contains("list") {
            Some(ElementKind::List)
        } else {
            None
        }
    }

    /// Label used by the built-in backend.
    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Heading => "section_heading",
            ElementKind::Paragraph => "paragraph",
            ElementKind::List => "list",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_substring() {
        assert_eq!(ElementKind::classify("section_heading"), Some(ElementKind::Heading));
        assert_eq!(ElementKind::classify("Heading"), Some(ElementKind::Heading));
        assert_eq!(ElementKind::classify("PARAGRAPH"), Some(ElementKind::Paragraph));
        assert_eq!(ElementKind::classify("list_item"), Some(ElementKind::List));
        assert_eq!(ElementKind::classify("caption"), None);
        assert_eq!(ElementKind::classify(""), None);
    }

    #[test]
    fn heading_wins_over_list() {
        assert_eq!(ElementKind::classify("list_heading"), Some(ElementKind::Heading));
        assert_eq!(ElementKind::classify("paragraph_list"), Some(ElementKind::Paragraph));
    }

    #[test]
    fn builtin_labels_round_trip() {
        for kind in [ElementKind::Heading, ElementKind::Paragraph, ElementKind::List] {
            assert_eq!(ElementKind::classify(kind.label()), Some(kind));
        }
    }
}
