//! Layout blocks: split raw page text into headings, paragraphs and lists.
//!
//! PDFium hands back plain text per page with no semantic labels. These
//! line-level rules recover enough structure for the markdown export and
//! the `structure` section of the output:
//!
//! - a list item starts with a bullet glyph, `-`, `*`, or an `N.` / `N)` / `a)` marker;
//! - a heading is a short line with no trailing punctuation that either
//!   carries multi-level section numbering (`2.1 Methods`, level = depth)
//!   or is written entirely in capitals (level 1);
//! - every other run of non-blank lines is one paragraph.

use crate::source::{DocElement, ElementKind};
use once_cell::sync::Lazy;
use regex::Regex;

const MAX_HEADING_CHARS: usize = 80;
const MAX_HEADING_LEVEL: u32 = 6;

static RE_LIST_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?P<bullet>[•◦▪▫‣⁃●○■□–\-\*])|(?P<ordinal>\d{1,3}|[a-z])[.)])\s+(?P<body>\S.*)$")
        .unwrap()
});

static RE_SECTION_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<num>\d{1,2}(?:\.\d{1,2})*)\.?\s+\p{Lu}").unwrap());

/// One block of page content in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u32, text: String },
    Paragraph(String),
    /// Items already rendered as markdown list lines (`- a`, `1. b`).
    List(Vec<String>),
}

impl Block {
    pub fn to_element(&self) -> DocElement {
        match self {
            Block::Heading { level, text } => {
                DocElement::new(ElementKind::Heading.label(), text.as_str()).with_level(*level)
            }
            Block::Paragraph(text) => DocElement::new(ElementKind::Paragraph.label(), text.as_str()),
            Block::List(items) => DocElement::new(ElementKind::List.label(), items.join("\n")),
        }
    }

    fn to_markdown(&self) -> String {
        match self {
            Block::Heading { level, text } => {
                format!("{} {}", "#".repeat(*level as usize), text)
            }
            Block::Paragraph(text) => text.clone(),
            Block::List(items) => items.join("\n"),
        }
    }
}

/// Split one page of text into blocks.
pub fn segment_page(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph = String::new();
    let mut list: Vec<String> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            flush_list(&mut list, &mut blocks);
        } else if let Some(item) = list_item(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            list.push(item);
        } else if let Some(level) = heading_level(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            flush_list(&mut list, &mut blocks);
            blocks.push(Block::Heading {
                level,
                text: line.to_string(),
            });
        } else {
            flush_list(&mut list, &mut blocks);
            append_line(&mut paragraph, line);
        }
    }

    flush_paragraph(&mut paragraph, &mut blocks);
    flush_list(&mut list, &mut blocks);
    blocks
}

/// Render blocks as markdown, one blank line between blocks.
pub fn render_markdown(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::to_markdown)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn flush_paragraph(paragraph: &mut String, blocks: &mut Vec<Block>) {
    if !paragraph.is_empty() {
        blocks.push(Block::Paragraph(std::mem::take(paragraph)));
    }
}

fn flush_list(list: &mut Vec<String>, blocks: &mut Vec<Block>) {
    if !list.is_empty() {
        blocks.push(Block::List(std::mem::take(list)));
    }
}

/// Join a wrapped line onto the paragraph, undoing end-of-line hyphenation.
fn append_line(paragraph: &mut String, line: &str) {
    if paragraph.is_empty() {
        paragraph.push_str(line);
        return;
    }
    let continues_word = line.chars().next().is_some_and(char::is_lowercase);
    if continues_word && paragraph.ends_with('-') && !paragraph.ends_with(" -") {
        paragraph.pop();
    } else {
        paragraph.push(' ');
    }
    paragraph.push_str(line);
}

fn list_item(line: &str) -> Option<String> {
    let caps = RE_LIST_ITEM.captures(line)?;
    let body = &caps["body"];
    match caps.name("ordinal") {
        Some(ordinal) if ordinal.as_str().chars().all(|c| c.is_ascii_digit()) => {
            Some(format!("{}. {}", ordinal.as_str(), body))
        }
        _ => Some(format!("- {}", body)),
    }
}

fn heading_level(line: &str) -> Option<u32> {
    if line.chars().count() > MAX_HEADING_CHARS || !line.chars().any(char::is_alphabetic) {
        return None;
    }
    if line.ends_with(['.', ',', ';', ':']) {
        return None;
    }

    if let Some(caps) = RE_SECTION_NUMBER.captures(line) {
        let depth = caps["num"].split('.').count() as u32;
        return Some(depth.min(MAX_HEADING_LEVEL));
    }

    let letters: Vec<char> = line.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() >= 3 && letters.iter().all(|c| c.is_uppercase()) {
        return Some(1);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_split_on_blank_lines_and_reflow() {
        let blocks = segment_page("First line of text\ncontinues here.\n\nSecond paragraph.");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph("First line of text continues here.".into()),
                Block::Paragraph("Second paragraph.".into()),
            ]
        );
    }

    #[test]
    fn hyphenated_words_are_rejoined() {
        let blocks = segment_page("An exam-\nple sentence.");
        assert_eq!(blocks, vec![Block::Paragraph("An example sentence.".into())]);
    }

    #[test]
    fn numbered_sections_become_headings_by_depth() {
        let blocks = segment_page("1 Introduction\nSome text.\n2.3 Results\nMore text.");
        assert_eq!(
            blocks[0],
            Block::Heading {
                level: 1,
                text: "1 Introduction".into()
            }
        );
        assert_eq!(
            blocks[2],
            Block::Heading {
                level: 2,
                text: "2.3 Results".into()
            }
        );
    }

    #[test]
    fn all_caps_line_is_level_one_heading() {
        let blocks = segment_page("ABSTRACT\nWe study things.");
        assert_eq!(
            blocks[0],
            Block::Heading {
                level: 1,
                text: "ABSTRACT".into()
            }
        );
    }

    #[test]
    fn sentences_are_not_headings() {
        assert_eq!(heading_level("This ends with a period."), None);
        assert_eq!(heading_level("3.14 is roughly pi"), None);
        assert_eq!(heading_level("42"), None);
        assert_eq!(heading_level("NASA"), Some(1));
    }

    #[test]
    fn bullets_and_ordinals_form_lists() {
        let blocks = segment_page("Intro text\n• apples\n• pears\n1) first\n2. second\nAfter.");
        assert_eq!(blocks[0], Block::Paragraph("Intro text".into()));
        assert_eq!(
            blocks[1],
            Block::List(vec![
                "- apples".into(),
                "- pears".into(),
                "1. first".into(),
                "2. second".into(),
            ])
        );
        assert_eq!(blocks[2], Block::Paragraph("After.".into()));
    }

    #[test]
    fn markdown_rendering() {
        let blocks = vec![
            Block::Heading {
                level: 2,
                text: "1.1 Scope".into(),
            },
            Block::Paragraph("Body.".into()),
            Block::List(vec!["- a".into(), "- b".into()]),
        ];
        assert_eq!(render_markdown(&blocks), "## 1.1 Scope\n\nBody.\n\n- a\n- b");
    }

    #[test]
    fn list_element_counts_items() {
        let element = Block::List(vec!["- a".into(), "- b".into(), "- c".into()]).to_element();
        assert_eq!(element.label.as_deref(), Some("list"));
        assert_eq!(element.text.as_deref(), Some("- a\n- b\n- c"));
    }
}
