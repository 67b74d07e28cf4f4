//! End-to-end integration tests for paperlift.
//!
//! Engine-dependent tests use real files in `./test_cases/` and invoke the
//! real engines (pandoc, pdfium, LibreOffice). They are gated behind the
//! `PAPERLIFT_E2E` environment variable so they do not run in CI unless
//! explicitly requested:
//!
//!   PAPERLIFT_E2E=1 cargo test --test e2e -- --nocapture
//!
//! The validation tests at the bottom run everywhere: they exercise the
//! fail-before-engine-contact contract and need no engine at all.

use paperlift::{convert_markdown_to_docx, convert_pdf_to_images, office, RasterConfig};
use std::path::PathBuf;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

/// Skip this test if PAPERLIFT_E2E is not set *or* no file at `path`.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("PAPERLIFT_E2E").is_err() {
            println!("SKIP — set PAPERLIFT_E2E=1 to run e2e tests");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP — test file not found: {}", p.display());
            return;
        }
        p
    }};
}

// ── Markdown pipeline (pandoc) ───────────────────────────────────────────────

#[test]
fn markdown_converts_to_a_real_docx() {
    let _ = e2e_skip_unless_ready!(test_cases_dir());

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sample.md");
    std::fs::write(
        &input,
        "# Title\n\n## Section\n\nSome *text* with a list:\n\n- one\n- two\n",
    )
    .unwrap();

    let output = convert_markdown_to_docx(&input, None).expect("conversion should succeed");

    assert_eq!(output, dir.path().join("sample.docx"));
    // A .docx is a ZIP container: check the PK magic.
    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

// ── Raster pipeline (pdfium) ─────────────────────────────────────────────────

#[test]
fn twelve_page_pdf_yields_twelve_padded_files() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("twelve_pages.pdf"));

    let out = tempfile::tempdir().unwrap();
    let config = RasterConfig::default();
    let dir = convert_pdf_to_images(&path, Some(out.path()), &config)
        .expect("rasterisation should succeed");

    let mut names: Vec<String> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    assert_eq!(names.len(), 12);
    assert_eq!(names.first().unwrap(), "twelve_pages_p01.png");
    assert_eq!(names.last().unwrap(), "twelve_pages_p12.png");
}

#[test]
fn page_range_limits_the_output() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("twelve_pages.pdf"));

    let out = tempfile::tempdir().unwrap();
    let config = RasterConfig::builder().page_range("2-4").build().unwrap();
    let dir = convert_pdf_to_images(&path, Some(out.path()), &config).unwrap();

    let count = std::fs::read_dir(&dir).unwrap().count();
    assert_eq!(count, 3);
}

// ── Office pipeline (LibreOffice) ────────────────────────────────────────────

#[test]
fn single_docx_converts_to_pdf() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("letter.docx"));

    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("letter.pdf");
    let result = office::convert_single(&path, Some(&output)).expect("conversion should succeed");

    assert_eq!(result, output);
    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[..4], b"%PDF");
}

#[test]
fn batch_survives_one_bad_input() {
    let good = e2e_skip_unless_ready!(test_cases_dir().join("letter.docx"));

    let dir = tempfile::tempdir().unwrap();
    // A .docx that is not actually a Word document.
    let bad = dir.path().join("broken.docx");
    std::fs::write(&bad, b"this is not a zip container").unwrap();

    let out = tempfile::tempdir().unwrap();
    let inputs = vec![good.clone(), bad.clone(), good.clone()];
    let result = office::convert_batch(&inputs, out.path()).expect("engine should start");

    assert_eq!(result.total, 3);
    assert!(result.failed.contains(&bad));
    assert!(!result.success.is_empty());
}

// ── Validation contract (no engine required) ─────────────────────────────────

#[test]
fn every_pipeline_reports_not_found_without_touching_an_engine() {
    let missing = PathBuf::from("/no/such/file");

    let err = convert_markdown_to_docx(&missing.with_extension("md"), None).unwrap_err();
    assert!(matches!(err, paperlift::ConvertError::NotFound { .. }));

    let err = convert_pdf_to_images(
        &missing.with_extension("pdf"),
        None,
        &RasterConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, paperlift::ConvertError::NotFound { .. }));

    let err = office::convert_single(&missing.with_extension("docx"), None).unwrap_err();
    assert!(matches!(err, paperlift::ConvertError::NotFound { .. }));
}

#[test]
fn extension_gate_precedes_engine_contact() {
    let dir = tempfile::tempdir().unwrap();
    let odd = dir.path().join("data.bin");
    std::fs::write(&odd, b"whatever").unwrap();

    let err = convert_markdown_to_docx(&odd, None).unwrap_err();
    assert!(matches!(
        err,
        paperlift::ConvertError::UnsupportedFormat { .. }
    ));

    let err = office::convert_single(&odd, None).unwrap_err();
    assert!(matches!(
        err,
        paperlift::ConvertError::UnsupportedFormat { .. }
    ));
}
