//! # pdfium-auto
//!
//! Fetch and cache [PDFium](https://pdfium.googlesource.com/pdfium/) release
//! binaries, then bind them through `pdfium-render`.
//!
//! ## How it works
//!
//! [`install`] resolves a [`PdfiumRelease`] to a platform archive from
//! [bblanchon/pdfium-binaries](https://github.com/bblanchon/pdfium-binaries),
//! downloads it once, and extracts the shared library into
//! `{cache root}/pdfium-{VERSION}/`. The path of the last install is recorded
//! in `{cache root}/current`. [`locate_library`] finds an installed copy
//! without touching the network, and [`bind_from_path`] loads it.
//!
//! ```rust,no_run
//! use pdfium_auto::{bind_from_path, install, PdfiumRelease};
//!
//! let release = PdfiumRelease::default();
//! let path = install(&release, None, Some(&|done, total| {
//!     if let Some(t) = total {
//!         eprint!("\rPDFium: {done}/{t} bytes");
//!     }
//! })).expect("install failed");
//! let pdfium = bind_from_path(&path).expect("bind failed");
//! ```
//!
//! ## Environment variable overrides
//!
//! - `PDFIUM_LIB_PATH`: path to an existing pdfium library; skips download.
//! - `PDFIUM_AUTO_CACHE_DIR`: override the default cache root.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use pdfium_render::prelude::Pdfium;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

// ── Public constants ─────────────────────────────────────────────────────────

/// The pdfium-binaries release tag installed when the manifest pins none.
pub const DEFAULT_PDFIUM_VERSION: &str = "7690";

/// Directory name used under the platform cache directory.
pub const CACHE_APP_DIR: &str = "docling-json";

/// File under the cache root naming the most recently installed library.
pub const CURRENT_MARKER: &str = "current";

const BASE_URL: &str = "https://github.com/bblanchon/pdfium-binaries/releases/download";

/// Upper bound on the buffer reserved from a server's Content-Length.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by pdfium-auto operations.
#[derive(Error, Debug)]
pub enum PdfiumAutoError {
    /// The current OS/architecture combination has no published build.
    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// A release tag that cannot appear in a download URL.
    #[error("Invalid PDFium release '{0}': expected a chromium build number")]
    InvalidRelease(String),

    /// Could not create or navigate the local cache directory.
    #[error("Cache directory error: {0}")]
    CacheDir(#[source] std::io::Error),

    /// Network download failed.
    #[error("Download failed: {0}")]
    Download(String),

    /// gzip/tar extraction failed.
    #[error("Archive extraction failed: {0}")]
    Extract(String),

    /// `pdfium-render` could not load the library.
    #[error("Failed to bind PDFium from '{path}': {reason}")]
    Bind { path: PathBuf, reason: String },
}

// ── Releases and platforms ───────────────────────────────────────────────────

/// A pdfium-binaries release, identified by its chromium build number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfiumRelease {
    version: String,
}

impl PdfiumRelease {
    /// Validate and wrap a chromium build number such as `"7690"`.
    pub fn new(version: impl Into<String>) -> Result<Self, PdfiumAutoError> {
        let version = version.into();
        if version.is_empty() || !version.chars().all(|c| c.is_ascii_digit()) {
            return Err(PdfiumAutoError::InvalidRelease(version));
        }
        Ok(Self { version })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Download URL of this release's archive for `platform`.
    pub fn archive_url(&self, platform: &Platform) -> String {
        format!(
            "{}/chromium%2F{}/{}",
            BASE_URL, self.version, platform.archive_name
        )
    }
}

impl Default for PdfiumRelease {
    fn default() -> Self {
        Self {
            version: DEFAULT_PDFIUM_VERSION.to_string(),
        }
    }
}

/// Where the shared library lives for one OS/architecture pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Asset filename in the GitHub release, e.g. `pdfium-linux-x64.tgz`.
    pub archive_name: &'static str,
    /// Relative path inside the archive, e.g. `lib/libpdfium.so`.
    pub lib_path_in_archive: &'static str,
    /// Filename written on disk, e.g. `libpdfium.so`.
    pub lib_name: &'static str,
}

impl Platform {
    /// The platform this process is running on.
    pub fn current() -> Result<Self, PdfiumAutoError> {
        Self::for_target(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn for_target(os: &str, arch: &str) -> Result<Self, PdfiumAutoError> {
        let (archive_name, lib_path_in_archive, lib_name) = match (os, arch) {
            ("macos", "aarch64") => ("pdfium-mac-arm64.tgz", "lib/libpdfium.dylib", "libpdfium.dylib"),
            ("macos", "x86_64") => ("pdfium-mac-x64.tgz", "lib/libpdfium.dylib", "libpdfium.dylib"),
            ("linux", "x86_64") => ("pdfium-linux-x64.tgz", "lib/libpdfium.so", "libpdfium.so"),
            ("linux", "aarch64") => ("pdfium-linux-arm64.tgz", "lib/libpdfium.so", "libpdfium.so"),
            ("windows", "x86_64") => ("pdfium-win-x64.tgz", "bin/pdfium.dll", "pdfium.dll"),
            ("windows", "aarch64") => ("pdfium-win-arm64.tgz", "bin/pdfium.dll", "pdfium.dll"),
            ("windows", "x86") => ("pdfium-win-x86.tgz", "bin/pdfium.dll", "pdfium.dll"),
            (os, arch) => {
                return Err(PdfiumAutoError::UnsupportedPlatform {
                    os: os.to_string(),
                    arch: arch.to_string(),
                })
            }
        };
        Ok(Self {
            archive_name,
            lib_path_in_archive,
            lib_name,
        })
    }
}

// ── Cache directory resolution ───────────────────────────────────────────────

/// Root under which every release gets its own `pdfium-{VERSION}` directory.
///
/// Resolution order: `base` argument, `PDFIUM_AUTO_CACHE_DIR`, then the
/// platform cache dir (`~/.cache/docling-json` on Linux).
pub fn cache_root(base: Option<&Path>) -> PathBuf {
    if let Some(base) = base {
        return base.to_path_buf();
    }
    if let Ok(override_dir) = std::env::var("PDFIUM_AUTO_CACHE_DIR") {
        return PathBuf::from(override_dir);
    }

    dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir)
        .join(CACHE_APP_DIR)
}

/// Per-release cache directory.
pub fn release_dir(release: &PdfiumRelease, base: Option<&Path>) -> PathBuf {
    cache_root(base).join(format!("pdfium-{}", release.version()))
}

/// Path of an installed library for `release`, or `None` if not cached.
pub fn installed_library(release: &PdfiumRelease, base: Option<&Path>) -> Option<PathBuf> {
    let platform = Platform::current().ok()?;
    let path = release_dir(release, base).join(platform.lib_name);
    path.exists().then_some(path)
}

/// Finds a usable library without network access.
///
/// `PDFIUM_LIB_PATH` wins when it points at an existing file; otherwise the
/// default cache root is searched with [`locate_in`].
pub fn locate_library() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("PDFIUM_LIB_PATH") {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Some(pb);
        }
        warn!("PDFIUM_LIB_PATH '{}' does not exist; ignoring", pb.display());
    }
    locate_in(&cache_root(None))
}

/// Finds an installed library under `root`.
///
/// The `current` marker is checked first, then every `pdfium-{VERSION}`
/// directory, highest build number first.
pub fn locate_in(root: &Path) -> Option<PathBuf> {
    if let Ok(recorded) = std::fs::read_to_string(root.join(CURRENT_MARKER)) {
        let path = PathBuf::from(recorded.trim());
        if path.is_file() {
            return Some(path);
        }
        debug!("Stale marker in {} points at {}", root.display(), path.display());
    }

    let platform = Platform::current().ok()?;
    std::fs::read_dir(root)
        .ok()?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name();
            let build: u64 = name.to_str()?.strip_prefix("pdfium-")?.parse().ok()?;
            let lib = entry.path().join(platform.lib_name);
            lib.is_file().then_some((build, lib))
        })
        .max_by_key(|(build, _)| *build)
        .map(|(_, lib)| lib)
}

/// Record `lib_path` as the current install under `root`.
fn record_current(root: &Path, lib_path: &Path) -> Result<(), PdfiumAutoError> {
    std::fs::create_dir_all(root).map_err(PdfiumAutoError::CacheDir)?;
    let mut marker = NamedTempFile::new_in(root).map_err(PdfiumAutoError::CacheDir)?;
    writeln!(marker, "{}", lib_path.display()).map_err(PdfiumAutoError::CacheDir)?;
    marker
        .persist(root.join(CURRENT_MARKER))
        .map_err(|e| PdfiumAutoError::CacheDir(e.error))?;
    Ok(())
}

// ── Install / bind ───────────────────────────────────────────────────────────

/// Ensures `release` is present in the cache, downloading it if necessary.
///
/// `on_progress` receives `(bytes_downloaded, total_size_option)` during
/// the download. Returns the on-disk path of the shared library and records
/// it as current under the cache root. An explicit `base` is also recorded
/// in the default cache root, so [`locate_library`] finds it.
pub fn install(
    release: &PdfiumRelease,
    base: Option<&Path>,
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<PathBuf, PdfiumAutoError> {
    let platform = Platform::current()?;
    let dir = release_dir(release, base);
    let lib_path = dir.join(platform.lib_name);

    if lib_path.is_file() {
        debug!("PDFium {} already cached at {}", release.version(), lib_path.display());
    } else {
        std::fs::create_dir_all(&dir).map_err(PdfiumAutoError::CacheDir)?;

        let url = release.archive_url(&platform);
        info!("Downloading PDFium {} from {}", release.version(), url);
        let archive_bytes = download_bytes(&url, on_progress)?;
        extract_library(&archive_bytes, platform.lib_path_in_archive, &lib_path)?;
        info!("PDFium installed at {}", lib_path.display());
    }

    let lib_path = std::fs::canonicalize(&lib_path).unwrap_or(lib_path);
    record_current(&cache_root(base), &lib_path)?;
    if base.is_some() {
        if let Err(e) = record_current(&cache_root(None), &lib_path) {
            warn!("Could not record install in the default cache: {e}");
        }
    }
    Ok(lib_path)
}

/// Binds to a PDFium library at an explicit `path`.
pub fn bind_from_path(path: &Path) -> Result<Pdfium, PdfiumAutoError> {
    Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| PdfiumAutoError::Bind {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

// ── Internal helpers ─────────────────────────────────────────────────────────

/// Streams a URL into a `Vec<u8>`, calling `on_progress` every 64 KiB.
fn download_bytes(
    url: &str,
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<Vec<u8>, PdfiumAutoError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pdfium-auto/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| PdfiumAutoError::Download(e.to_string()))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| PdfiumAutoError::Download(format!("GET {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(PdfiumAutoError::Download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }

    let total = response.content_length();
    let mut buf = Vec::with_capacity(prealloc_len(total));
    let mut chunk = vec![0u8; 64 * 1024];
    let mut downloaded: u64 = 0;

    loop {
        match response.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                downloaded += n as u64;
                if let Some(cb) = on_progress {
                    cb(downloaded, total);
                }
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(PdfiumAutoError::Download(format!("Read error: {e}"))),
        }
    }

    Ok(buf)
}

/// Buffer to reserve for a body of `content_length` bytes; the header is
/// advisory, so the reservation is capped.
fn prealloc_len(content_length: Option<u64>) -> usize {
    content_length.unwrap_or(0).min(MAX_PREALLOC) as usize
}

/// Extracts a single file from a gzipped tar archive into `dest_path`.
///
/// The entry is unpacked to a temporary file next to `dest_path` and renamed
/// into place, so `dest_path` either holds the whole library or nothing.
fn extract_library(
    archive_bytes: &[u8],
    lib_path_in_archive: &str,
    dest_path: &Path,
) -> Result<(), PdfiumAutoError> {
    use flate2::read::GzDecoder;
    use tar::Archive;

    let mut archive = Archive::new(GzDecoder::new(archive_bytes));

    for entry in archive
        .entries()
        .map_err(|e| PdfiumAutoError::Extract(e.to_string()))?
    {
        let mut entry = entry.map_err(|e| PdfiumAutoError::Extract(e.to_string()))?;
        let matches = entry
            .path()
            .map_err(|e| PdfiumAutoError::Extract(e.to_string()))?
            .to_string_lossy()
            .trim_start_matches("./")
            == lib_path_in_archive;

        if matches {
            let dir = dest_path.parent().unwrap_or_else(|| Path::new("."));
            let mut staged = NamedTempFile::new_in(dir).map_err(PdfiumAutoError::CacheDir)?;
            let expected = entry.size();
            let written = std::io::copy(&mut entry, &mut staged)
                .map_err(|e| PdfiumAutoError::Extract(format!("Unpack failed: {e}")))?;
            if written != expected {
                return Err(PdfiumAutoError::Extract(format!(
                    "Truncated library: {written} of {expected} bytes"
                )));
            }
            staged
                .as_file()
                .sync_all()
                .map_err(|e| PdfiumAutoError::Extract(format!("Unpack failed: {e}")))?;
            staged
                .persist(dest_path)
                .map_err(|e| PdfiumAutoError::Extract(format!("Unpack failed: {}", e.error)))?;
            return Ok(());
        }
    }

    Err(PdfiumAutoError::Extract(format!(
        "Library '{}' not found in archive",
        lib_path_in_archive
    )))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
