//! # pandoc-auto
//!
//! Locate, download, and cache a private [Pandoc](https://pandoc.org/) binary
//! at runtime, so that users of paperlift do not need to install pandoc
//! themselves before converting their first document.
//!
//! ## How it works
//!
//! On first call to [`ensure_pandoc`]:
//!
//! 1. If `PANDOC_PATH` points to an existing file, that binary is used.
//! 2. If a `pandoc` on `PATH` answers a `--version` probe, it is used.
//! 3. Otherwise checks `~/.cache/paperlift/pandoc-{VERSION}/` for a
//!    previously downloaded copy.
//! 4. If absent, downloads the release tarball from
//!    [jgm/pandoc](https://github.com/jgm/pandoc/releases) and extracts the
//!    `bin/pandoc` binary into the cache directory. Exactly one download is
//!    attempted; a failure is surfaced, never retried.
//!
//! Subsequent calls skip the network entirely — the binary is already cached.
//!
//! ## Usage
//!
//! ```rust,no_run
//! let pandoc = pandoc_auto::ensure_pandoc(Some(&|downloaded, total| {
//!     if let Some(t) = total {
//!         eprint!("\rDownloading pandoc: {}/{} bytes", downloaded, t);
//!     }
//! })).expect("pandoc unavailable");
//!
//! let version = pandoc_auto::pandoc_version(&pandoc).expect("probe failed");
//! eprintln!("using pandoc {version}");
//! ```
//!
//! ## Platform support
//!
//! Automatic download is available where upstream publishes plain tarballs:
//!
//! | OS    | Arch    | Asset                              |
//! |-------|---------|------------------------------------|
//! | Linux | x86_64  | `pandoc-{V}-linux-amd64.tar.gz`    |
//! | Linux | aarch64 | `pandoc-{V}-linux-arm64.tar.gz`    |
//!
//! On macOS and Windows upstream ships installers, not tarballs; there the
//! crate still honours `PANDOC_PATH` and a `pandoc` already on `PATH`, and
//! otherwise returns [`PandocAutoError::UnsupportedPlatform`] with an
//! instruction to install pandoc manually.
//!
//! ## Environment variable overrides
//!
//! - `PANDOC_PATH` — path to an existing pandoc binary; skips probe and download.
//! - `PANDOC_AUTO_CACHE_DIR` — override the default cache directory.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// The pandoc release tag used for downloads.
pub const PANDOC_VERSION: &str = "3.2.1";

/// GitHub release base URL.
const BASE_URL: &str = "https://github.com/jgm/pandoc/releases/download";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by pandoc-auto operations.
#[derive(Error, Debug)]
pub enum PandocAutoError {
    /// No pandoc on PATH and no downloadable asset for this OS/arch.
    #[error(
        "No pandoc found and automatic download is not available on {os}/{arch}.\n\
         Install pandoc from https://pandoc.org/installing.html and retry,\n\
         or set PANDOC_PATH to an existing binary."
    )]
    UnsupportedPlatform { os: String, arch: String },

    /// Could not create or navigate the local cache directory.
    #[error("Cache directory error: {0}")]
    CacheDir(#[source] std::io::Error),

    /// Network download failed.
    #[error("Download failed: {0}")]
    Download(String),

    /// gzip/tar extraction failed.
    #[error("Archive extraction failed: {0}")]
    Extract(String),

    /// A `pandoc --version` probe could not be run or returned failure.
    #[error("Version probe failed for '{path}': {reason}")]
    Probe { path: PathBuf, reason: String },
}

// ── Internal: platform metadata ──────────────────────────────────────────────

struct PlatformInfo {
    /// Asset filename in the GitHub release, e.g. `pandoc-3.2.1-linux-amd64.tar.gz`.
    archive_name: String,
    /// Relative path inside the archive, e.g. `pandoc-3.2.1/bin/pandoc`.
    bin_path_in_archive: String,
}

fn detect_platform() -> Result<PlatformInfo, PandocAutoError> {
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;

    let asset_arch = match (os, arch) {
        ("linux", "x86_64") => "amd64",
        ("linux", "aarch64") => "arm64",
        (os, arch) => {
            return Err(PandocAutoError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            })
        }
    };

    Ok(PlatformInfo {
        archive_name: format!("pandoc-{PANDOC_VERSION}-linux-{asset_arch}.tar.gz"),
        bin_path_in_archive: format!("pandoc-{PANDOC_VERSION}/bin/pandoc"),
    })
}

// ── Cache directory resolution ───────────────────────────────────────────────

/// Returns the per-version cache directory for the private pandoc copy.
///
/// Default locations:
/// - **Linux**: `~/.cache/paperlift/pandoc-{VERSION}/`
/// - **macOS**: `~/Library/Caches/paperlift/pandoc-{VERSION}/`
///
/// Override by setting `PANDOC_AUTO_CACHE_DIR`.
pub fn pandoc_cache_dir() -> PathBuf {
    if let Ok(override_dir) = std::env::var("PANDOC_AUTO_CACHE_DIR") {
        return PathBuf::from(override_dir).join(format!("pandoc-{PANDOC_VERSION}"));
    }

    let base = dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir);

    base.join("paperlift").join(format!("pandoc-{PANDOC_VERSION}"))
}

// ── Thread-safe singleton path cache ─────────────────────────────────────────

static RESOLVED_PATH: OnceLock<PathBuf> = OnceLock::new();

// ── Public API ───────────────────────────────────────────────────────────────

/// Runs `pandoc --version` against `path` and returns the reported version,
/// e.g. `"3.2.1"`.
pub fn pandoc_version(path: &Path) -> Result<String, PandocAutoError> {
    let output = Command::new(path)
        .arg("--version")
        .output()
        .map_err(|e| PandocAutoError::Probe {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(PandocAutoError::Probe {
            path: path.to_path_buf(),
            reason: format!("exit status {}", output.status),
        });
    }

    // First line is "pandoc X.Y.Z".
    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = stdout
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .map(str::to_string)
        .ok_or_else(|| PandocAutoError::Probe {
            path: path.to_path_buf(),
            reason: "unparseable --version output".to_string(),
        })?;

    Ok(version)
}

/// Returns `true` if a usable pandoc is already resolvable without any
/// network access: `PANDOC_PATH`, `PATH`, or the on-disk cache.
pub fn is_pandoc_cached() -> bool {
    cached_pandoc_path().is_some()
}

/// Returns the path to a locally available pandoc, or `None` if a download
/// would be required.
pub fn cached_pandoc_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("PANDOC_PATH") {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Some(pb);
        }
    }
    let on_path = PathBuf::from("pandoc");
    if pandoc_version(&on_path).is_ok() {
        return Some(on_path);
    }
    let cached = pandoc_cache_dir().join("pandoc");
    if cached.exists() {
        return Some(cached);
    }
    None
}

/// Ensures a pandoc binary is available, downloading a private copy if
/// necessary, and returns its path.
///
/// Resolution order:
///
/// 1. `PANDOC_PATH` (if the file exists).
/// 2. `pandoc` on `PATH` (must answer a `--version` probe).
/// 3. A previously cached copy in [`pandoc_cache_dir`].
/// 4. One download attempt from the jgm/pandoc GitHub release.
///
/// `on_progress` receives `(bytes_downloaded, total_size_option)` during
/// the download. Pass `None` to suppress progress callbacks.
///
/// # Thread safety
///
/// Safe to call from multiple threads simultaneously; the download happens
/// only once per process lifetime.
pub fn ensure_pandoc(
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<PathBuf, PandocAutoError> {
    // Fast path: already resolved in this process.
    if let Some(path) = RESOLVED_PATH.get() {
        return Ok(path.clone());
    }

    let path = resolve_or_download(on_progress)?;

    // Best-effort cache in the OnceLock (ignore race; both will succeed).
    let _ = RESOLVED_PATH.set(path.clone());

    Ok(path)
}

// ── Internal helpers ─────────────────────────────────────────────────────────

fn resolve_or_download(
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<PathBuf, PandocAutoError> {
    if let Some(path) = cached_pandoc_path() {
        return Ok(path);
    }

    let info = detect_platform()?;
    let cache_dir = pandoc_cache_dir();
    let bin_path = cache_dir.join("pandoc");

    let url = format!("{BASE_URL}/{PANDOC_VERSION}/{}", info.archive_name);

    std::fs::create_dir_all(&cache_dir).map_err(PandocAutoError::CacheDir)?;

    let archive_bytes = download_bytes(&url, on_progress)?;
    extract_binary(&archive_bytes, &info.bin_path_in_archive, &bin_path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&bin_path, std::fs::Permissions::from_mode(0o755))
            .map_err(|e| PandocAutoError::Extract(format!("chmod failed: {e}")))?;
    }

    Ok(bin_path)
}

/// Streams a URL into a `Vec<u8>`, calling `on_progress` every 64 KiB.
fn download_bytes(
    url: &str,
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<Vec<u8>, PandocAutoError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pandoc-auto/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| PandocAutoError::Download(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| PandocAutoError::Download(format!("GET {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(PandocAutoError::Download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }

    let total = response.content_length();
    let capacity = total.unwrap_or(40 * 1024 * 1024) as usize;
    let mut buf = Vec::with_capacity(capacity);

    let mut stream = response;
    let mut chunk = vec![0u8; 64 * 1024]; // 64 KiB
    let mut downloaded: u64 = 0;

    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                downloaded += n as u64;
                if let Some(cb) = on_progress {
                    cb(downloaded, total);
                }
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(PandocAutoError::Download(format!("Read error: {e}")));
            }
        }
    }

    Ok(buf)
}

/// Extracts a single file from a gzipped tar archive into `dest_path`.
fn extract_binary(
    archive_bytes: &[u8],
    bin_path_in_archive: &str,
    dest_path: &Path,
) -> Result<(), PandocAutoError> {
    use flate2::read::GzDecoder;
    use tar::Archive;

    let gz = GzDecoder::new(archive_bytes);
    let mut archive = Archive::new(gz);

    for entry in archive
        .entries()
        .map_err(|e| PandocAutoError::Extract(e.to_string()))?
    {
        let mut entry = entry.map_err(|e| PandocAutoError::Extract(e.to_string()))?;
        let entry_path = entry
            .path()
            .map_err(|e| PandocAutoError::Extract(e.to_string()))?;

        if entry_path.to_string_lossy() == bin_path_in_archive {
            entry
                .unpack(dest_path)
                .map_err(|e| PandocAutoError::Extract(format!("Unpack failed: {e}")))?;
            return Ok(());
        }
    }

    Err(PandocAutoError::Extract(format!(
        "Binary '{bin_path_in_archive}' not found in archive"
    )))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_dir_is_deterministic() {
        let d1 = pandoc_cache_dir();
        let d2 = pandoc_cache_dir();
        assert_eq!(d1, d2);
        assert!(d1.to_str().unwrap().contains(PANDOC_VERSION));
    }

    #[test]
    fn probe_nonexistent_binary_fails() {
        let err = pandoc_version(Path::new("/nonexistent/pandoc")).unwrap_err();
        assert!(matches!(err, PandocAutoError::Probe { .. }));
    }

    #[test]
    fn archive_layout_matches_release_convention() {
        if let Ok(info) = detect_platform() {
            assert!(info.archive_name.starts_with("pandoc-"));
            assert!(info.archive_name.ends_with(".tar.gz"));
            assert!(info.bin_path_in_archive.ends_with("bin/pandoc"));
        }
    }

    #[test]
    fn extract_reports_missing_entry() {
        // An empty gzip stream contains no entries at all.
        use flate2::write::GzEncoder;
        use std::io::Write;
        let mut enc = GzEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(&[]).unwrap();
        let bytes = enc.finish().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let err = extract_binary(&bytes, "pandoc-x/bin/pandoc", &dir.path().join("pandoc"))
            .unwrap_err();
        assert!(matches!(err, PandocAutoError::Extract(_)));
    }
}
