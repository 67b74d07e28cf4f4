//! CLI entry point for PDF→page-image conversion.
//!
//! With positional arguments this is a one-shot converter; with no
//! arguments it enters the interactive form mode.

use clap::Parser;
use paperlift::{interactive, logging, raster, ImageFormat, RasterConfig};
use std::path::PathBuf;
use tracing::{error, info};

const AFTER_HELP: &str = r#"EXAMPLES:
  # Every page as PNG at 2x zoom into report_images/
  pdf_to_images report.pdf

  # Pages 1-5 as JPEG at 3x zoom into a chosen directory
  pdf_to_images report.pdf out jpg 3.0 1-5

  # No arguments: interactive form mode
  pdf_to_images

PAGE RANGES:
  'N' selects one page, 'N-M' an inclusive range; '-M' starts at page 1
  and 'N-' runs to the last page. Pages are numbered from 1.

ENGINE:
  pdfium is loaded from the system library path, or from
  PDFIUM_LIB_PATH=/path/to/libpdfium.

EXIT CODES:
  0  success
  1  conversion failed (details in pdf_to_images.log)
  2  usage error
"#;

/// Convert PDF pages to numbered image files using pdfium.
#[derive(Parser, Debug)]
#[command(
    name = "pdf_to_images",
    version,
    about = "Convert PDF pages to numbered PNG/JPEG files using pdfium",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input PDF file. Omit all arguments for interactive form mode.
    input: Option<PathBuf>,

    /// Output directory. Defaults to '<stem>_images' next to the input.
    output_dir: Option<PathBuf>,

    /// Image format: png or jpg.
    #[arg(default_value = "png")]
    format: ImageFormat,

    /// Scale factor relative to 72 dpi (2.0 ≈ 144 dpi).
    #[arg(default_value_t = 2.0)]
    zoom: f32,

    /// Page range, e.g. '1-5' or '3'. All pages when omitted.
    page_range: Option<String>,

    /// JPEG quality factor (1-100).
    #[arg(long, default_value_t = 92)]
    quality: u8,

    /// Keep the alpha channel in PNG output.
    #[arg(long)]
    keep_alpha: bool,

    /// Enable DEBUG-level logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init("pdf_to_images", cli.verbose, cli.quiet) {
        eprintln!("Failed to initialise logging: {e}");
        std::process::exit(1);
    }

    let Some(ref input) = cli.input else {
        if let Err(e) = interactive::pdf_to_images_form() {
            error!("Conversion failed: {e}");
            std::process::exit(1);
        }
        return;
    };

    let config = match build_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    match raster::convert_pdf_to_images(input, cli.output_dir.as_deref(), &config) {
        Ok(dir) => {
            info!("Conversion succeeded: {}", dir.display());
            if !cli.quiet {
                println!("Images written to: {}", dir.display());
            }
        }
        Err(e) => {
            error!("Conversion failed: {e}");
            std::process::exit(1);
        }
    }
}

fn build_config(cli: &Cli) -> Result<RasterConfig, paperlift::ConvertError> {
    let mut builder = RasterConfig::builder()
        .format(cli.format)
        .zoom(cli.zoom)
        .jpeg_quality(cli.quality)
        .keep_alpha(cli.keep_alpha);
    if let Some(ref range) = cli.page_range {
        builder = builder.page_range(range.clone());
    }
    builder.build()
}
