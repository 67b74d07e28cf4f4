//! Markdown→Word conversion through pandoc.
//!
//! A single engine invocation with a fixed argument set; there is no retry
//! beyond the one automatic download attempt `pandoc-auto` makes when the
//! version probe fails. Any further failure is surfaced verbatim as
//! [`ConvertError::EngineFailure`] carrying pandoc's stderr.

use crate::error::ConvertError;
use crate::input;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Fixed pandoc argument set: common extension syntax, standalone document,
/// generated table of contents to depth 3, automatic wrapping.
const PANDOC_ARGS: &[&str] = &[
    "--from=markdown+emoji+autolink_bare_uris+lists_without_preceding_blankline",
    "--to=docx",
    "--standalone",
    "--toc",
    "--toc-depth=3",
    "--markdown-headings=setext",
    "--wrap=auto",
    "--quiet",
];

/// Convert a Markdown file to a Word (`.docx`) document.
///
/// `output` defaults to a sibling `{stem}.docx`; an output path without an
/// extension gets `.docx` appended. Parent directories are created.
///
/// # Errors
/// - [`ConvertError::NotFound`] / [`ConvertError::UnsupportedFormat`] for
///   bad inputs (checked before the engine bootstrap);
/// - [`ConvertError::EngineUnavailable`] when pandoc is missing and the
///   one-time download fails;
/// - [`ConvertError::EngineFailure`] when pandoc itself raises.
pub fn convert_markdown_to_docx(
    input_md: &Path,
    output: Option<&Path>,
) -> Result<PathBuf, ConvertError> {
    input::require_readable(input_md)?;
    input::require_extension(input_md, input::MARKDOWN_EXTENSIONS, ".md / .markdown")?;

    let output = resolve_output(input_md, output);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConvertError::OutputWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let pandoc = ensure_pandoc()?;
    debug!("Using pandoc at {}", pandoc.display());

    let result = Command::new(&pandoc)
        .args(PANDOC_ARGS)
        .arg("--output")
        .arg(&output)
        .arg(input_md)
        .output()
        .map_err(|e| ConvertError::EngineFailure {
            engine: "pandoc",
            detail: format!("could not run '{}': {e}", pandoc.display()),
        })?;

    if !result.status.success() {
        return Err(ConvertError::EngineFailure {
            engine: "pandoc",
            detail: String::from_utf8_lossy(&result.stderr).trim().to_string(),
        });
    }

    info!("Converted: {} -> {}", input_md.display(), output.display());
    Ok(output)
}

/// Ensure pandoc is installed, attempting exactly one automatic private
/// download when the version probe fails.
fn ensure_pandoc() -> Result<PathBuf, ConvertError> {
    if !pandoc_auto::is_pandoc_cached() {
        info!("Pandoc not detected, attempting automatic download...");
    }
    let path = pandoc_auto::ensure_pandoc(None).map_err(|e| ConvertError::EngineUnavailable {
        engine: "pandoc",
        detail: e.to_string(),
    })?;
    Ok(path)
}

/// Default or complete the output path: sibling `{stem}.docx` when absent,
/// `.docx` appended when the caller gave a path with no extension.
fn resolve_output(input_md: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(p) if p.extension().is_some() => p.to_path_buf(),
        Some(p) => p.with_extension("docx"),
        None => input_md.with_extension("docx"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_defaults_next_to_the_input() {
        assert_eq!(
            resolve_output(Path::new("/notes/plan.md"), None),
            PathBuf::from("/notes/plan.docx")
        );
    }

    #[test]
    fn output_without_extension_gets_docx() {
        assert_eq!(
            resolve_output(Path::new("plan.md"), Some(Path::new("out/plan"))),
            PathBuf::from("out/plan.docx")
        );
    }

    #[test]
    fn explicit_output_extension_is_kept() {
        assert_eq!(
            resolve_output(Path::new("plan.md"), Some(Path::new("final.docx"))),
            PathBuf::from("final.docx")
        );
    }

    #[test]
    fn missing_input_fails_before_the_engine_bootstrap() {
        let err = convert_markdown_to_docx(Path::new("/no/such/notes.md"), None).unwrap_err();
        assert!(matches!(err, ConvertError::NotFound { .. }));
    }

    #[test]
    fn wrong_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "# hello").unwrap();

        let err = convert_markdown_to_docx(&path, None).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat { .. }));
    }

    #[test]
    fn argument_set_is_fixed() {
        // The option set is part of the contract: standalone, TOC depth 3,
        // automatic wrapping.
        assert!(PANDOC_ARGS.contains(&"--standalone"));
        assert!(PANDOC_ARGS.contains(&"--toc-depth=3"));
        assert!(PANDOC_ARGS.contains(&"--wrap=auto"));
    }
}
