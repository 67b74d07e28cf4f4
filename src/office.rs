//! Word→PDF conversion through the LibreOffice automation interface.
//!
//! ## Engine lifecycle
//!
//! Starting the office engine is the expensive step, so the batch path
//! acquires one [`OfficeEngine`] for the whole batch and every per-file
//! failure is recorded without aborting the loop. [`convert_single`] instead
//! acquires and releases its own engine per call; both behaviours are part
//! of the public contract.
//!
//! The engine owns a throwaway LibreOffice user-profile directory
//! (`-env:UserInstallation=…`) so conversions never collide with a running
//! desktop instance or with each other. `Drop` removes the profile on every
//! exit path, including panics — the release is never optional.

use crate::error::ConvertError;
use crate::input;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tracing::{debug, error, info};

/// Outcome of one batch invocation: ordered output paths for the files that
/// converted, ordered input paths for the files that did not, and the total
/// number of inputs. Discarded after reporting.
#[derive(Debug, Default, Serialize)]
pub struct BatchResult {
    pub success: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
    pub total: usize,
}

/// A running LibreOffice automation handle: a located `soffice` binary plus
/// a dedicated user-profile directory, released on `Drop`.
pub struct OfficeEngine {
    soffice: PathBuf,
    profile: TempDir,
}

impl OfficeEngine {
    /// Locate and start the office engine.
    ///
    /// Looks for `SOFFICE_PATH`, then `soffice` and `libreoffice` on `PATH`,
    /// probing each candidate with `--version`.
    ///
    /// # Errors
    /// [`ConvertError::AutomationFailure`] when no working binary is found
    /// or the profile directory cannot be created.
    pub fn start() -> Result<Self, ConvertError> {
        let soffice = locate_soffice().ok_or_else(|| ConvertError::AutomationFailure {
            detail: "no working 'soffice' binary found\n\
                     Install LibreOffice or set SOFFICE_PATH=/path/to/soffice."
                .to_string(),
        })?;

        let profile = TempDir::new().map_err(|e| ConvertError::AutomationFailure {
            detail: format!("could not create profile directory: {e}"),
        })?;

        info!("Office engine started: {}", soffice.display());
        Ok(Self { soffice, profile })
    }

    /// Convert one office document to PDF at exactly `output`.
    ///
    /// Runs `soffice --headless --convert-to pdf` into the output's parent
    /// directory; LibreOffice always names its product `{stem}.pdf`, so the
    /// result is renamed when the caller asked for a different name.
    pub fn export_pdf(&self, input: &Path, output: &Path) -> Result<PathBuf, ConvertError> {
        input::require_readable(input)?;
        input::require_extension(input, input::OFFICE_EXTENSIONS, ".doc / .docx / .rtf")?;

        let out_dir = output.parent().filter(|p| !p.as_os_str().is_empty());
        let out_dir = match out_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(|e| ConvertError::OutputWrite {
                    path: dir.to_path_buf(),
                    source: e,
                })?;
                dir.to_path_buf()
            }
            None => PathBuf::from("."),
        };

        info!("Converting: {}", input.display());
        let result = Command::new(&self.soffice)
            .arg("--headless")
            .arg("--norestore")
            .arg(format!(
                "-env:UserInstallation=file://{}",
                self.profile.path().display()
            ))
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(&out_dir)
            .arg(input)
            .output()
            .map_err(|e| ConvertError::AutomationFailure {
                detail: format!("could not run '{}': {e}", self.soffice.display()),
            })?;

        if !result.status.success() {
            return Err(ConvertError::AutomationFailure {
                detail: format!(
                    "conversion of '{}' exited with {}: {}",
                    input.display(),
                    result.status,
                    String::from_utf8_lossy(&result.stderr).trim()
                ),
            });
        }

        let produced = out_dir.join(default_pdf_name(input));
        if !produced.exists() {
            return Err(ConvertError::AutomationFailure {
                detail: format!(
                    "'{}' reported success but produced no '{}'",
                    self.soffice.display(),
                    produced.display()
                ),
            });
        }

        if produced != output {
            std::fs::rename(&produced, output).map_err(|e| ConvertError::OutputWrite {
                path: output.to_path_buf(),
                source: e,
            })?;
        }

        info!("Converted: {}", output.display());
        Ok(output.to_path_buf())
    }
}

impl Drop for OfficeEngine {
    fn drop(&mut self) {
        // TempDir removes the profile; the log line marks the release.
        debug!("Office engine released: {}", self.soffice.display());
    }
}

/// Convert one document with a private engine: acquire, convert, release.
///
/// `output` defaults to a sibling `{stem}.pdf`. Input validation happens
/// before the engine starts, so a missing file never costs an engine spawn.
pub fn convert_single(input: &Path, output: Option<&Path>) -> Result<PathBuf, ConvertError> {
    input::require_readable(input)?;
    input::require_extension(input, input::OFFICE_EXTENSIONS, ".doc / .docx / .rtf")?;

    let output = match output {
        Some(p) => p.to_path_buf(),
        None => input.with_extension("pdf"),
    };

    let engine = OfficeEngine::start()?;
    engine.export_pdf(input, &output)
}

/// Convert a batch of documents into `output_dir`, one engine for the whole
/// batch. One file's failure never aborts the remaining items; an engine
/// that will not start fails the batch as a whole.
pub fn convert_batch(inputs: &[PathBuf], output_dir: &Path) -> Result<BatchResult, ConvertError> {
    std::fs::create_dir_all(output_dir).map_err(|e| ConvertError::OutputWrite {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let engine = OfficeEngine::start()?;
    Ok(run_batch(inputs, output_dir, |input, output| {
        engine.export_pdf(input, output)
    }))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Drive the batch loop over an injected per-file converter. Split out so
/// the isolation semantics are testable without LibreOffice installed.
fn run_batch<F>(inputs: &[PathBuf], output_dir: &Path, mut convert_one: F) -> BatchResult
where
    F: FnMut(&Path, &Path) -> Result<PathBuf, ConvertError>,
{
    let mut result = BatchResult {
        total: inputs.len(),
        ..BatchResult::default()
    };

    for (i, input) in inputs.iter().enumerate() {
        info!(
            "Processing file {}/{}: {}",
            i + 1,
            inputs.len(),
            input.display()
        );
        let output = output_dir.join(default_pdf_name(input));

        match convert_one(input, &output) {
            Ok(path) => result.success.push(path),
            Err(e) => {
                error!("Failed to convert '{}': {}", input.display(), e);
                result.failed.push(input.clone());
            }
        }
    }

    result
}

/// `{stem}.pdf` for a given input path.
fn default_pdf_name(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "output".into());
    let mut name = stem;
    name.push(".pdf");
    PathBuf::from(name)
}

fn locate_soffice() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("SOFFICE_PATH") {
        let p = PathBuf::from(p);
        if probe_soffice(&p) {
            return Some(p);
        }
    }
    ["soffice", "libreoffice"]
        .iter()
        .map(PathBuf::from)
        .find(|p| probe_soffice(p))
}

fn probe_soffice(path: &Path) -> bool {
    Command::new(path)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
