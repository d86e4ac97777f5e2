//! Configuration for the parser and the installer.
//!
//! Both programs take a small struct built through a builder, so callers set
//! only what they care about and rely on documented defaults for the rest.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default manifest read by the installer.
pub const DEFAULT_MANIFEST: &str = "requirements.txt";

/// Configuration for a single parse.
///
/// # Example
/// ```rust
/// use docling_json::{PageSelection, ParserConfig};
///
/// let config = ParserConfig::builder()
///     .pages(PageSelection::Range(1, 3))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Pages to read. Default: all.
    ///
    /// Metadata still reports the full page count of the document.
    pub pages: PageSelection,

    /// Inserted between pages in the markdown export. Default: blank line.
    pub page_separator: PageSeparator,

    /// Explicit PDFium shared library.
    ///
    /// When unset the engine is located through `PDFIUM_LIB_PATH`, the
    /// installer's cache, and finally the system library path.
    pub library_path: Option<PathBuf>,
}

impl ParserConfig {
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ParserConfig`].
#[derive(Debug)]
pub struct ParserConfigBuilder {
    config: ParserConfig,
}

impl ParserConfigBuilder {
    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn page_separator(mut self, sep: PageSeparator) -> Self {
        self.config.page_separator = sep;
        self
    }

    pub fn library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.library_path = Some(path.into());
        self
    }

    /// Build the configuration, validating the page selection.
    pub fn build(self) -> Result<ParserConfig, ParseError> {
        self.config.pages.validate()?;
        Ok(self.config)
    }
}

/// Installer configuration.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// Dependency manifest. Default: `requirements.txt` in the working directory.
    pub manifest_path: PathBuf,

    /// Cache root for downloaded engine builds.
    pub cache_dir: Option<PathBuf>,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(DEFAULT_MANIFEST),
            cache_dir: None,
        }
    }
}

impl SetupConfig {
    pub fn builder() -> SetupConfigBuilder {
        SetupConfigBuilder {
            config: Self::default(),
        }
    }

    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }
}

/// Builder for [`SetupConfig`].
#[derive(Debug)]
pub struct SetupConfigBuilder {
    config: SetupConfig,
}

impl SetupConfigBuilder {
    pub fn manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.manifest_path = path.into();
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> SetupConfig {
        self.config
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which pages of the PDF to read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Every page (default).
    #[default]
    All,
    /// A single page (1-indexed).
    Single(usize),
    /// A contiguous range (1-indexed, inclusive).
    Range(usize, usize),
    /// Specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    fn validate(&self) -> Result<(), ParseError> {
        match self {
            PageSelection::All => Ok(()),
            PageSelection::Single(0) => Err(ParseError::InvalidConfig(
                "Pages are 1-indexed, minimum is 1 (got 0)".into(),
            )),
            PageSelection::Single(_) => Ok(()),
            PageSelection::Range(start, end) if *start < 1 || start > end => Err(
                ParseError::InvalidConfig(format!("Invalid page range '{start}-{end}'")),
            ),
            PageSelection::Range(..) => Ok(()),
            PageSelection::Set(pages) if pages.contains(&0) => Err(ParseError::InvalidConfig(
                "Pages are 1-indexed, minimum is 1 (got 0)".into(),
            )),
            PageSelection::Set(_) => Ok(()),
        }
    }
}

impl std::str::FromStr for PageSelection {
    type Err = ParseError;

    /// Accepts `all`, `5`, `3-15` or `1,3,5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let number = |p: &str| {
            p.trim()
                .parse::<usize>()
                .map_err(|_| ParseError::InvalidConfig(format!("Invalid page number: '{}'", p.trim())))
        };

        let selection = if s == "all" {
            PageSelection::All
        } else if let Some((start, end)) = s.split_once('-') {
            PageSelection::Range(number(start)?, number(end)?)
        } else if s.contains(',') {
            PageSelection::Set(s.split(',').map(number).collect::<Result<_, _>>()?)
        } else {
            PageSelection::Single(number(&s)?)
        };

        selection.validate()?;
        Ok(selection)
    }
}

/// How pages are joined in the markdown export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSeparator {
    /// Pages joined with a blank line. (default)
    #[default]
    None,
    /// Horizontal rule: "\n\n---\n\n"
    HorizontalRule,
    /// HTML comment with page number: "<!-- page N -->"
    Comment,
    /// Custom string inserted between pages.
    Custom(String),
}

impl PageSeparator {
    /// Render the separator placed before page `page_num` (1-indexed).
    pub fn render(&self, page_num: usize) -> String {
        match self {
            PageSeparator::None => "\n\n".to_string(),
            PageSeparator::HorizontalRule => "\n\n---\n\n".to_string(),
            PageSeparator::Comment => format!("\n\n<!-- page {} -->\n\n", page_num),
            PageSeparator::Custom(s) => format!("\n\n{}\n\n", s),
        }
    }
}

impl From<&str> for PageSeparator {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "none" => PageSeparator::None,
            "hr" | "---" => PageSeparator::HorizontalRule,
            "comment" => PageSeparator::Comment,
            _ => PageSeparator::Custom(s.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(3), vec![0, 1, 2]);
        assert_eq!(PageSelection::Single(2).to_indices(3), vec![1]);
        assert_eq!(PageSelection::Single(9).to_indices(3), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 10).to_indices(4), vec![1, 2, 3]);
        assert_eq!(PageSelection::Set(vec![3, 1, 3]).to_indices(5), vec![0, 2]);
    }

    #[test]
    fn page_selection_from_str() {
        assert_eq!("all".parse::<PageSelection>().unwrap(), PageSelection::All);
        assert_eq!("4".parse::<PageSelection>().unwrap(), PageSelection::Single(4));
        assert_eq!(" 2-5 ".parse::<PageSelection>().unwrap(), PageSelection::Range(2, 5));
        assert_eq!(
            "1,3,5".parse::<PageSelection>().unwrap(),
            PageSelection::Set(vec![1, 3, 5])
        );
        assert!("0".parse::<PageSelection>().is_err());
        assert!("5-2".parse::<PageSelection>().is_err());
        assert!("one".parse::<PageSelection>().is_err());
    }

    #[test]
    fn builder_rejects_zero_page() {
        let err = ParserConfig::builder()
            .pages(PageSelection::Set(vec![0, 1]))
            .build()
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidConfig(_)));
    }

    #[test]
    fn separator_rendering() {
        assert_eq!(PageSeparator::None.render(2), "\n\n");
        assert_eq!(PageSeparator::Comment.render(3), "\n\n<!-- page 3 -->\n\n");
        assert_eq!(PageSeparator::from("hr"), PageSeparator::HorizontalRule);
        assert_eq!(PageSeparator::from("* * *"), PageSeparator::Custom("* * *".into()));
    }

    #[test]
    fn setup_defaults_to_requirements_txt() {
        let config = SetupConfig::default();
        assert_eq!(config.manifest_path, PathBuf::from("requirements.txt"));
        assert!(config.cache_dir().is_none());
    }
}
