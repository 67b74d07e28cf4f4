//! Input validation: existence, extension, and magic-byte checks.
//!
//! Each pipeline validates up front, before any engine handle is acquired,
//! so a missing or mistyped input never costs a pandoc bootstrap or a
//! LibreOffice start. We verify the `%PDF` magic bytes before handing a file
//! to pdfium so callers get a meaningful error rather than an engine crash.

use crate::error::ConvertError;
use std::io::Read;
use std::path::Path;

/// Extensions the Markdown pipeline accepts.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Extensions the office pipeline accepts.
pub const OFFICE_EXTENSIONS: &[&str] = &["doc", "docx", "rtf"];

/// Check that `path` exists and is readable.
pub fn require_readable(path: &Path) -> Result<(), ConvertError> {
    if !path.exists() {
        return Err(ConvertError::NotFound {
            path: path.to_path_buf(),
        });
    }
    match std::fs::File::open(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(ConvertError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(ConvertError::NotFound {
            path: path.to_path_buf(),
        }),
    }
}

/// Check that `path` carries one of `allowed` extensions (case-insensitive).
pub fn require_extension(
    path: &Path,
    allowed: &[&str],
    expected: &'static str,
) -> Result<(), ConvertError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext {
        Some(ext) if allowed.contains(&ext.as_str()) => Ok(()),
        _ => Err(ConvertError::UnsupportedFormat {
            path: path.to_path_buf(),
            expected,
        }),
    }
}

/// Validate a PDF input: readable, `.pdf` extension, and `%PDF` magic bytes.
pub fn require_pdf(path: &Path) -> Result<(), ConvertError> {
    require_readable(path)?;
    require_extension(path, &["pdf"], ".pdf")?;

    let mut file = std::fs::File::open(path).map_err(|_| ConvertError::NotFound {
        path: path.to_path_buf(),
    })?;
    let mut magic = [0u8; 4];
    if file.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
        return Err(ConvertError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_file_is_not_found() {
        let err = require_readable(Path::new("/no/such/file.pdf")).unwrap_err();
        assert!(matches!(err, ConvertError::NotFound { .. }));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(require_extension(
            &PathBuf::from("Notes.MD"),
            MARKDOWN_EXTENSIONS,
            ".md / .markdown"
        )
        .is_ok());
        assert!(require_extension(
            &PathBuf::from("report.DocX"),
            OFFICE_EXTENSIONS,
            ".doc / .docx / .rtf"
        )
        .is_ok());
    }

    #[test]
    fn wrong_extension_is_unsupported() {
        let err = require_extension(
            &PathBuf::from("slides.pptx"),
            OFFICE_EXTENSIONS,
            ".doc / .docx / .rtf",
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat { .. }));
    }

    #[test]
    fn non_pdf_magic_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();

        let err = require_pdf(&path).unwrap_err();
        assert!(matches!(err, ConvertError::NotAPdf { .. }));
    }

    #[test]
    fn pdf_magic_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("real.pdf");
        std::fs::write(&path, b"%PDF-1.7\n%fake body").unwrap();

        assert!(require_pdf(&path).is_ok());
    }

    #[test]
    fn tiny_file_without_magic_passes_extension_but_not_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.pdf");
        std::fs::write(&path, b"ab").unwrap();

        // Too short to read four magic bytes: accepted here, pdfium will
        // reject it with its own corrupt-document error.
        assert!(require_pdf(&path).is_ok());
    }
}
