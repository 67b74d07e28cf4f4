//! Interactive form mode for the `word_pdf` and `pdf_to_images` tools.
//!
//! A terminal form replaces the original desktop dialogs: dialoguer prompts
//! collect the parameters, the pipeline is dispatched onto a one-shot worker
//! thread, and an indicatif spinner streams status back while the engine
//! runs. The prompt loop never blocks on the engine directly.

use crate::config::{ImageFormat, RasterConfig};
use crate::error::ConvertError;
use crate::office::{self, BatchResult};
use crate::raster;
use crate::worker::{self, JobHandle};
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Interactive form for Word→PDF: single-file or batch conversion.
pub fn word_pdf_form() -> Result<(), ConvertError> {
    println!("=== Word to PDF ===");

    let mode = Select::new()
        .with_prompt("Conversion mode")
        .items(&["Single file", "Batch (multiple files into one directory)"])
        .default(0)
        .interact()
        .map_err(prompt_error)?;

    if mode == 0 {
        let input = prompt_existing_path("Word document (.doc/.docx/.rtf)")?;
        let default_output = input.with_extension("pdf").display().to_string();
        let output: String = Input::new()
            .with_prompt("Output PDF path")
            .default(default_output)
            .interact_text()
            .map_err(prompt_error)?;
        let output = PathBuf::from(output);

        let handle = worker::dispatch(move || office::convert_single(&input, Some(&output)));
        let path = run_with_spinner("Converting…", handle)?;
        println!("Converted: {}", path.display());
    } else {
        let list: String = Input::new()
            .with_prompt("Input documents (comma-separated paths)")
            .validate_with(|s: &String| -> Result<(), String> {
                let missing: Vec<&str> = s
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty() && !Path::new(p).exists())
                    .collect();
                if missing.is_empty() {
                    Ok(())
                } else {
                    Err(format!("not found: {}", missing.join(", ")))
                }
            })
            .interact_text()
            .map_err(prompt_error)?;
        let inputs: Vec<PathBuf> = list
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect();

        let output_dir: String = Input::new()
            .with_prompt("Output directory")
            .default("converted_pdfs".to_string())
            .interact_text()
            .map_err(prompt_error)?;
        let output_dir = PathBuf::from(output_dir);

        let handle = worker::dispatch(move || office::convert_batch(&inputs, &output_dir));
        let result = run_with_spinner("Converting batch…", handle)?;
        report_batch(&result);
    }

    Ok(())
}

/// Interactive form for PDF→page-images.
pub fn pdf_to_images_form() -> Result<(), ConvertError> {
    println!("=== PDF to images ===");

    let input = prompt_existing_path("PDF file")?;

    let output_dir: String = Input::new()
        .with_prompt("Output directory (empty for '<stem>_images' next to the input)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_error)?;
    let output_dir = if output_dir.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(output_dir.trim()))
    };

    let format = match Select::new()
        .with_prompt("Image format")
        .items(&["png (lossless)", "jpg (smaller files)"])
        .default(0)
        .interact()
        .map_err(prompt_error)?
    {
        0 => ImageFormat::Png,
        _ => ImageFormat::Jpeg,
    };

    let zoom: f32 = Input::new()
        .with_prompt("Zoom factor (1.0 = 72 dpi, 2.0 ≈ 144 dpi)")
        .default(2.0f32)
        .interact_text()
        .map_err(prompt_error)?;

    let range: String = Input::new()
        .with_prompt("Page range, e.g. '1-5' or '3' (empty for all pages)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_error)?;

    let mut builder = RasterConfig::builder().format(format).zoom(zoom);
    if !range.trim().is_empty() {
        builder = builder.page_range(range.trim());
    }
    if format == ImageFormat::Jpeg {
        let quality: u8 = Input::new()
            .with_prompt("JPEG quality (1-100)")
            .default(92u8)
            .interact_text()
            .map_err(prompt_error)?;
        builder = builder.jpeg_quality(quality);
    } else {
        let keep_alpha = Confirm::new()
            .with_prompt("Keep alpha channel?")
            .default(false)
            .interact()
            .map_err(prompt_error)?;
        builder = builder.keep_alpha(keep_alpha);
    }
    let config = builder.build()?;

    // Reject a bad range before dispatching, while the user can still fix it.
    raster::validate_range(&input, config.page_range.as_deref())?;

    let out = output_dir.clone();
    let handle =
        worker::dispatch(move || raster::convert_pdf_to_images(&input, out.as_deref(), &config));
    let dir = run_with_spinner("Rendering pages…", handle)?;
    println!("Images written to: {}", dir.display());

    Ok(())
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn prompt_existing_path(prompt: &str) -> Result<PathBuf, ConvertError> {
    let path: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|s: &String| -> Result<(), String> {
            if Path::new(s.trim()).exists() {
                Ok(())
            } else {
                Err(format!("path '{}' does not exist", s.trim()))
            }
        })
        .interact_text()
        .map_err(prompt_error)?;
    Ok(PathBuf::from(path.trim()))
}

/// Drive the spinner until the dispatched job completes.
fn run_with_spinner<T>(message: &str, handle: JobHandle<T>) -> Result<T, ConvertError> {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));

    let outcome = loop {
        if let Some(outcome) = handle.poll(Duration::from_millis(100)) {
            break outcome;
        }
    };

    bar.finish_and_clear();
    outcome
}

fn report_batch(result: &BatchResult) {
    println!(
        "Batch complete: {} succeeded, {} failed ({} total)",
        result.success.len(),
        result.failed.len(),
        result.total
    );
    if !result.failed.is_empty() {
        println!("Failed inputs:");
        for path in &result.failed {
            println!("  - {}", path.display());
        }
    }
}

fn prompt_error(e: dialoguer::Error) -> ConvertError {
    ConvertError::Internal(format!("prompt failed: {e}"))
}
