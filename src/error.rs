//! Error types for the paperlift library.
//!
//! One enum covers all three pipelines. Two disciplines matter here:
//!
//! * Every variant is a user-facing description — CLI entry points catch
//!   [`ConvertError`] at the top level, log it, print it, and map it to a
//!   non-zero exit code. No variant is ever silently swallowed.
//!
//! * Batch office conversion isolates per-item failures inside
//!   [`crate::office::BatchResult`] instead of propagating them, so one bad
//!   input does not abort the remaining items. Single-file operations do not
//!   isolate and propagate immediately.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the paperlift library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    NotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file extension is not one the pipeline accepts.
    #[error("Unsupported format for '{path}': expected {expected}")]
    UnsupportedFormat { path: PathBuf, expected: &'static str },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Page-range errors ─────────────────────────────────────────────────
    /// The page-range string could not be parsed at all.
    #[error("Malformed page range '{range}': expected 'N' or 'N-M', e.g. '3' or '1-5'")]
    RangeSyntax { range: String },

    /// The page range parsed but selects no pages after clamping.
    #[error("Invalid page range '{range}': end is before start (document has {page_count} pages)")]
    InvalidRange { range: String, page_count: usize },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// An external engine is missing and could not be bootstrapped.
    #[error("{engine} is unavailable: {detail}")]
    EngineUnavailable { engine: &'static str, detail: String },

    /// An external engine was invoked and raised during conversion.
    #[error("{engine} failed: {detail}")]
    EngineFailure { engine: &'static str, detail: String },

    /// The office automation interface could not start, open, or save.
    #[error("Office automation failed: {detail}")]
    AutomationFailure { detail: String },

    /// The rendering library returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RenderFailed { page: usize, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file or directory.
    #[error("Failed to write output '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_range_display_names_page_count() {
        let e = ConvertError::InvalidRange {
            range: "5-2".into(),
            page_count: 10,
        };
        let msg = e.to_string();
        assert!(msg.contains("5-2"), "got: {msg}");
        assert!(msg.contains("10 pages"), "got: {msg}");
    }

    #[test]
    fn range_syntax_display_shows_expected_forms() {
        let e = ConvertError::RangeSyntax { range: "abc".into() };
        let msg = e.to_string();
        assert!(msg.contains("'N' or 'N-M'"), "got: {msg}");
    }

    #[test]
    fn unsupported_format_display() {
        let e = ConvertError::UnsupportedFormat {
            path: PathBuf::from("notes.txt"),
            expected: ".md / .markdown",
        };
        assert!(e.to_string().contains(".md / .markdown"));
    }

    #[test]
    fn engine_failure_carries_detail_verbatim() {
        let e = ConvertError::EngineFailure {
            engine: "pandoc",
            detail: "Unknown option --frobnicate".into(),
        };
        assert!(e.to_string().contains("Unknown option --frobnicate"));
    }
}
