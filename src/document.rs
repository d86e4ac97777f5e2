//! The JSON schema printed by the parser.
//!
//! Field names are part of the wire contract. On success the top-level
//! object has exactly `content`, `metadata`, `tables`, `images` and
//! `structure`; on failure it has exactly `error`.

use serde::{Deserialize, Serialize};

/// A normalized document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Markdown export of the whole document.
    pub content: String,
    pub metadata: Metadata,
    pub tables: Vec<TableSummary>,
    pub images: Vec<ImageSummary>,
    pub structure: Structure,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub author: String,
    /// Page count, 0 when the engine does not report one.
    pub pages: usize,
    /// Whitespace-separated words in `content`.
    pub word_count: usize,
    /// Unicode scalar values in `content`.
    pub char_count: usize,
}

impl Metadata {
    /// Fill the counters from the markdown content.
    pub fn count_content(&mut self, content: &str) {
        self.word_count = content.split_whitespace().count();
        self.char_count = content.chars().count();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub index: usize,
    pub content: String,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSummary {
    pub index: usize,
    pub description: String,
    pub caption: String,
}

/// Heading, paragraph and list elements in reading order, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub headings: Vec<Heading>,
    pub paragraphs: Vec<Paragraph>,
    pub lists: Vec<ListBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub text: String,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub length: usize,
}

impl Paragraph {
    pub fn new(text: String) -> Self {
        let length = text.chars().count();
        Self { text, length }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListBlock {
    pub text: String,
    /// One item per line.
    pub items: usize,
}

impl ListBlock {
    pub fn new(text: String) -> Self {
        let items = text.matches('\n').count() + 1;
        Self { text, items }
    }
}

/// What the parser prints: either the document or a single error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParseOutcome {
    Failed { error: String },
    Parsed(ParsedDocument),
}

impl ParseOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ParseOutcome::Parsed(_))
    }

    /// Pretty JSON with 2-space indentation.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<ParsedDocument> for ParseOutcome {
    fn from(doc: ParsedDocument) -> Self {
        ParseOutcome::Parsed(doc)
    }
}
