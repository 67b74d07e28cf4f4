//! PDF rasterisation: render each selected page to an image file via pdfium.
//!
//! ## Why encode fully in memory before writing?
//!
//! Each page is encoded into a buffer and written with a single call, so no
//! partially written image is ever visible on disk — if page N fails, pages
//! 1..N are complete files and page N simply does not exist. Failure of any
//! page aborts the whole operation; there is no partial-success bookkeeping
//! inside a single document (unlike the batch office pipeline).
//!
//! ## Filename scheme
//!
//! `{stem}_p{page:0width$}.{ext}` where `page` is 1-based and `width` is the
//! digit count of the final selected page number, so files sort
//! lexicographically in page order regardless of document size.

use crate::config::{ImageFormat, RasterConfig};
use crate::error::ConvertError;
use crate::input;
use crate::pages::{parse_page_range, PageInterval};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Convert the selected pages of a PDF into one image file per page.
///
/// `output_dir` defaults to a sibling directory named `{stem}_images`. The
/// directory is created if absent and returned on success.
///
/// # Errors
/// - [`ConvertError::NotFound`] / [`ConvertError::NotAPdf`] /
///   [`ConvertError::UnsupportedFormat`] for bad inputs;
/// - [`ConvertError::RangeSyntax`] / [`ConvertError::InvalidRange`] for a bad
///   page-range expression;
/// - [`ConvertError::EngineUnavailable`] when no pdfium library can be bound;
/// - [`ConvertError::RenderFailed`] when any page fails to render or encode —
///   the whole operation aborts on the first failing page.
pub fn convert_pdf_to_images(
    input_pdf: &Path,
    output_dir: Option<&Path>,
    config: &RasterConfig,
) -> Result<PathBuf, ConvertError> {
    input::require_pdf(input_pdf)?;

    let stem = input_pdf
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("page")
        .to_string();

    let out_dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input_pdf
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(format!("{stem}_images")),
    };
    std::fs::create_dir_all(&out_dir).map_err(|e| ConvertError::OutputWrite {
        path: out_dir.clone(),
        source: e,
    })?;

    let pdfium = bind_pdfium()?;
    let document = pdfium
        .load_pdf_from_file(input_pdf, None)
        .map_err(|e| ConvertError::EngineFailure {
            engine: "pdfium",
            detail: format!("could not open '{}': {e:?}", input_pdf.display()),
        })?;

    let pages = document.pages();
    let page_count = pages.len() as usize;
    info!("PDF loaded: {} pages", page_count);

    let interval = parse_page_range(config.page_range.as_deref(), page_count)?;
    let width = interval.pad_width();

    let render_config = PdfRenderConfig::new().scale_page_by_factor(config.zoom);

    for idx in interval.iter() {
        let page = pages
            .get(idx as u16)
            .map_err(|e| ConvertError::RenderFailed {
                page: idx + 1,
                detail: format!("{e:?}"),
            })?;

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| ConvertError::RenderFailed {
                page: idx + 1,
                detail: format!("{e:?}"),
            })?;

        let image = bitmap.as_image();
        let image = if config.keep_alpha {
            image
        } else {
            DynamicImage::ImageRgb8(image.to_rgb8())
        };

        let name = page_file_name(&stem, idx + 1, width, config.format.extension());
        let out_file = out_dir.join(&name);

        let bytes = encode_page(&image, config).map_err(|e| ConvertError::RenderFailed {
            page: idx + 1,
            detail: format!("image encoding failed: {e}"),
        })?;
        std::fs::write(&out_file, &bytes).map_err(|e| ConvertError::OutputWrite {
            path: out_file.clone(),
            source: e,
        })?;

        info!("Exported: {}", out_file.display());
        debug!(
            "Page {} rendered at {}x{} px ({} bytes)",
            idx + 1,
            image.width(),
            image.height(),
            bytes.len()
        );
    }

    info!(
        "Conversion complete: {} pages -> {}",
        interval.len(),
        out_dir.display()
    );
    Ok(out_dir)
}

/// Open a PDF and report its page count, without rendering anything.
pub fn page_count(input_pdf: &Path) -> Result<usize, ConvertError> {
    input::require_pdf(input_pdf)?;
    let pdfium = bind_pdfium()?;
    let document = pdfium
        .load_pdf_from_file(input_pdf, None)
        .map_err(|e| ConvertError::EngineFailure {
            engine: "pdfium",
            detail: format!("could not open '{}': {e:?}", input_pdf.display()),
        })?;
    Ok(document.pages().len() as usize)
}

/// Validate a page range against a document on disk, returning the
/// normalised interval. Used by front ends to reject bad ranges before
/// dispatching the conversion.
pub fn validate_range(input_pdf: &Path, range: Option<&str>) -> Result<PageInterval, ConvertError> {
    let count = page_count(input_pdf)?;
    parse_page_range(range, count)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Bind to a pdfium library: `PDFIUM_LIB_PATH` override, else the system
/// library search path.
fn bind_pdfium() -> Result<Pdfium, ConvertError> {
    let bindings = if let Ok(lib) = std::env::var("PDFIUM_LIB_PATH") {
        Pdfium::bind_to_library(&lib)
    } else {
        Pdfium::bind_to_system_library()
    };

    bindings.map(Pdfium::new).map_err(|e| ConvertError::EngineUnavailable {
        engine: "pdfium",
        detail: format!(
            "{e}\nInstall libpdfium or set PDFIUM_LIB_PATH=/path/to/libpdfium."
        ),
    })
}

/// Build the per-page output filename: 1-based page number, zero-padded.
fn page_file_name(stem: &str, page_num: usize, width: usize, ext: &str) -> String {
    format!("{stem}_p{page_num:0width$}.{ext}")
}

/// Encode a rendered page fully into memory.
fn encode_page(image: &DynamicImage, config: &RasterConfig) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    match config.format {
        ImageFormat::Png => {
            image.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
        }
        ImageFormat::Jpeg => {
            let mut cursor = Cursor::new(&mut buf);
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                &mut cursor,
                config.jpeg_quality,
            );
            image.write_with_encoder(encoder)?;
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::parse_page_range;

    #[test]
    fn filenames_are_zero_padded_to_the_final_page() {
        let interval = parse_page_range(None, 12).unwrap();
        let w = interval.pad_width();
        assert_eq!(page_file_name("doc", 1, w, "png"), "doc_p01.png");
        assert_eq!(page_file_name("doc", 12, w, "png"), "doc_p12.png");

        let interval = parse_page_range(None, 120).unwrap();
        let w = interval.pad_width();
        assert_eq!(page_file_name("doc", 1, w, "png"), "doc_p001.png");
        assert_eq!(page_file_name("doc", 120, w, "png"), "doc_p120.png");
    }

    #[test]
    fn filenames_sort_in_page_order() {
        let interval = parse_page_range(None, 12).unwrap();
        let w = interval.pad_width();
        let mut names: Vec<String> = interval
            .iter()
            .map(|i| page_file_name("doc", i + 1, w, "png"))
            .collect();
        assert_eq!(names.len(), 12);
        let rendered_order = names.clone();
        names.sort();
        assert_eq!(names, rendered_order);
    }

    #[test]
    fn jpeg_extension_is_jpg() {
        assert_eq!(page_file_name("doc", 3, 1, "jpg"), "doc_p3.jpg");
    }

    #[test]
    fn encode_round_trips_both_formats() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            8,
            8,
            image::Rgb([200, 10, 10]),
        ));

        let png = encode_page(&img, &RasterConfig::default()).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let jpeg_config = RasterConfig::builder()
            .format(ImageFormat::Jpeg)
            .jpeg_quality(80)
            .build()
            .unwrap();
        let jpg = encode_page(&img, &jpeg_config).unwrap();
        assert_eq!(&jpg[..2], &[0xFF, 0xD8]); // JPEG SOI marker
    }

    #[test]
    fn missing_input_fails_before_any_engine_contact() {
        let err = convert_pdf_to_images(
            Path::new("/no/such/input.pdf"),
            None,
            &RasterConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::NotFound { .. }));
    }
}
