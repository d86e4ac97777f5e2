//! The dependency manifest: a pip-style `requirements.txt`.
//!
//! ```text
//! # engine build used by docling-parser
//! pdfium==7690
//! --index-url https://mirror.example/simple
//! docling>=2.0
//! ```
//!
//! Comments and blank lines are skipped and option lines (leading `-`) are
//! kept for command installers. A line of the form `name[extras] op version`
//! becomes a [`Requirement`]; any other line (multi-constraint specs, direct
//! references, VCS URLs) is kept verbatim, since the package manager reading
//! the file is the authority on its syntax.

use crate::error::SetupError;
use once_cell::sync::Lazy;
use pdfium_auto::PdfiumRelease;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};

/// Requirement name that selects the PDFium build.
pub const PDFIUM_REQUIREMENT: &str = "pdfium";

static RE_REQUIREMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z0-9][A-Za-z0-9._\-]*)(?:\[[^\]]*\])?\s*(?:(?P<op>==|>=|<=|~=|!=|>|<)\s*(?P<version>[^\s;,]+))?\s*(?:;.*)?$")
        .unwrap()
});

/// One `name[op version]` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub constraint: Option<(String, String)>,
}

impl Requirement {
    /// Version when pinned with `==`.
    pub fn pinned_version(&self) -> Option<&str> {
        match &self.constraint {
            Some((op, version)) if op == "==" => Some(version.as_str()),
            _ => None,
        }
    }

    fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Some((op, version)) => write!(f, "{}{}{}", self.name, op, version),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub path: PathBuf,
    pub requirements: Vec<Requirement>,
    /// Option lines such as `--index-url …`, in file order.
    pub options: Vec<String>,
    /// Requirement lines not understood here, in file order.
    pub verbatim: Vec<String>,
}

impl Manifest {
    /// Read and parse the manifest; an absent file is [`SetupError::MissingManifest`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SetupError::MissingManifest {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|e| SetupError::InvalidManifest {
            path: path.to_path_buf(),
            line: 0,
            detail: e.to_string(),
        })?;
        Self::parse(path, &text)
    }

    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self, SetupError> {
        let path = path.into();
        let mut manifest = Manifest {
            path,
            requirements: Vec::new(),
            options: Vec::new(),
            verbatim: Vec::new(),
        };

        for raw in text.lines() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('-') {
                manifest.options.push(line.to_string());
                continue;
            }

            let Some(caps) = RE_REQUIREMENT.captures(line) else {
                manifest.verbatim.push(line.to_string());
                continue;
            };
            let constraint = match (caps.name("op"), caps.name("version")) {
                (Some(op), Some(version)) => {
                    Some((op.as_str().to_string(), version.as_str().to_string()))
                }
                _ => None,
            };
            manifest.requirements.push(Requirement {
                name: caps["name"].to_string(),
                constraint,
            });
        }

        Ok(manifest)
    }

    /// Everything the manifest asks for, parsed requirements first.
    pub fn listed(&self) -> Vec<String> {
        self.requirements
            .iter()
            .map(ToString::to_string)
            .chain(self.verbatim.iter().cloned())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.matches_name(name))
    }

    /// PDFium build to install: the `pdfium==N` pin, or the default release.
    pub fn pdfium_release(&self) -> Result<PdfiumRelease, SetupError> {
        match self.get(PDFIUM_REQUIREMENT).and_then(Requirement::pinned_version) {
            Some(version) => {
                PdfiumRelease::new(version).map_err(|e| SetupError::InvalidManifest {
                    path: self.path.clone(),
                    line: 0,
                    detail: e.to_string(),
                })
            }
            None => Ok(PdfiumRelease::default()),
        }
    }
}

/// `#` starts a comment at line start or after whitespace; URL fragments survive.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            return &line[..i];
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_requirements_options_and_comments() {
        let text = "# engine\npdfium==6996\n\n--index-url https://x/simple#frag\ndocling >= 2.1  # parser\npypdfium2\npython-dotenv[cli]~=1.0; python_version > \"3.8\"\n";
        let m = Manifest::parse("requirements.txt", text).unwrap();

        assert_eq!(m.options, vec!["--index-url https://x/simple#frag".to_string()]);
        let names: Vec<&str> = m.requirements.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["pdfium", "docling", "pypdfium2", "python-dotenv"]);
        assert_eq!(m.get("DOCLING").unwrap().to_string(), "docling>=2.1");
        assert_eq!(m.get("pypdfium2").unwrap().constraint, None);
        assert_eq!(
            m.get("python-dotenv").unwrap().constraint,
            Some(("~=".to_string(), "1.0".to_string()))
        );
    }

    #[test]
    fn pdfium_release_follows_pin() {
        let m = Manifest::parse("r.txt", "pdfium==6996\n").unwrap();
        assert_eq!(m.pdfium_release().unwrap().version(), "6996");

        let m = Manifest::parse("r.txt", "pdfium>=6000\n").unwrap();
        assert_eq!(m.pdfium_release().unwrap(), PdfiumRelease::default());

        let m = Manifest::parse("r.txt", "pdfium==latest\n").unwrap();
        assert!(matches!(
            m.pdfium_release(),
            Err(SetupError::InvalidManifest { .. })
        ));
    }

    #[test]
    fn unrecognised_lines_are_kept_verbatim() {
        let text = "docling>=2.0,<3.0\nmypkg @ https://example.com/mypkg-1.0-py3-none-any.whl\ngit+https://github.com/org/repo.git@v1#egg=repo\npdfium==6996\n";
        let m = Manifest::parse("r.txt", text).unwrap();

        assert_eq!(m.requirements.len(), 1);
        assert_eq!(m.verbatim.len(), 3);
        assert_eq!(m.verbatim[0], "docling>=2.0,<3.0");
        assert_eq!(m.pdfium_release().unwrap().version(), "6996");
        assert_eq!(m.listed()[0], "pdfium==6996");
        assert_eq!(m.listed().len(), 4);
    }

    #[test]
    fn multi_constraint_pdfium_is_not_a_pin() {
        let m = Manifest::parse("r.txt", "pdfium>=6000,<8000\n").unwrap();
        assert!(m.get(PDFIUM_REQUIREMENT).is_none());
        assert_eq!(m.pdfium_release().unwrap(), PdfiumRelease::default());
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Manifest::load(dir.path().join("requirements.txt")).unwrap_err();
        assert!(matches!(err, SetupError::MissingManifest { .. }));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requirements.txt");
        std::fs::write(&path, "pdfium==7690\n").unwrap();
        let m = Manifest::load(&path).unwrap();
        assert_eq!(m.path, path);
        assert_eq!(m.requirements.len(), 1);
    }
}
