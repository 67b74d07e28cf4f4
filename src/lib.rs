//! # paperlift
//!
//! Three independent document-conversion utilities behind one library:
//!
//! ```text
//! Markdown ──▶ pandoc ───────────▶ .docx      (md_to_word)
//! PDF ───────▶ pdfium ──────────▶ page PNGs/JPEGs  (pdf_to_images)
//! Word ──────▶ LibreOffice ─────▶ .pdf        (word_pdf, single or batch)
//! ```
//!
//! Each pipeline is a thin wrapper around an external engine: input
//! validation, path normalisation, one engine call, logging. None depends on
//! another and nothing outlives a single invocation except the output files
//! and the per-tool log.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use paperlift::{convert_pdf_to_images, RasterConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RasterConfig::builder().zoom(2.0).page_range("1-5").build()?;
//!     let out_dir = convert_pdf_to_images(Path::new("report.pdf"), None, &config)?;
//!     println!("images in {}", out_dir.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Engine availability
//!
//! - **pandoc** is probed and, when missing, downloaded once into a private
//!   cache by the `pandoc-auto` crate.
//! - **pdfium** binds to the system library, or to `PDFIUM_LIB_PATH`.
//! - **LibreOffice** (`soffice`) must be installed; `SOFFICE_PATH` overrides
//!   the lookup.
//!
//! ## Concurrency model
//!
//! Every pipeline is single-threaded at its core. The only concurrency is
//! at the presentation layer: the interactive form mode dispatches each
//! action onto a one-shot worker thread ([`worker`]) and polls a completion
//! channel, keeping the prompt responsive. There is no cancellation and no
//! engine timeout.
//!
//! ## Feature flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Binaries, logging setup, and the interactive form mode (clap + dialoguer + indicatif + tracing-subscriber) |
//!
//! Library errors are always concrete [`ConvertError`] values; the binaries
//! map them straight to log lines and exit codes without rewrapping.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod input;
pub mod markdown;
pub mod office;
pub mod pages;
pub mod raster;
pub mod worker;

#[cfg(feature = "cli")]
pub mod interactive;
#[cfg(feature = "cli")]
pub mod logging;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ImageFormat, RasterConfig, RasterConfigBuilder};
pub use error::ConvertError;
pub use markdown::convert_markdown_to_docx;
pub use office::{convert_batch, convert_single, BatchResult, OfficeEngine};
pub use pages::{parse_page_range, PageInterval};
pub use raster::{convert_pdf_to_images, page_count};
