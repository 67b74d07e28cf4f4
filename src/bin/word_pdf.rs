//! CLI entry point for Word→PDF conversion.
//!
//! With an input argument this converts a single document; with no
//! arguments it enters the interactive form mode, which also offers batch
//! conversion.

use clap::Parser;
use paperlift::{interactive, logging, office, BatchResult};
use std::path::PathBuf;
use tracing::{error, info};

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert next to the input (report.docx -> report.pdf)
  word_pdf report.docx

  # Convert to an explicit path
  word_pdf report.docx out/report.pdf

  # No arguments: interactive form mode (single or batch)
  word_pdf

ENGINE:
  Requires LibreOffice; the first working 'soffice' or 'libreoffice' on
  PATH is used. Override with SOFFICE_PATH=/path/to/soffice.

EXIT CODES:
  0  success
  1  conversion failed (details in word_to_pdf.log)
  2  usage error
"#;

/// Convert Word documents (.doc/.docx/.rtf) to PDF via LibreOffice.
#[derive(Parser, Debug)]
#[command(
    name = "word_pdf",
    version,
    about = "Convert Word documents (.doc/.docx/.rtf) to PDF via LibreOffice",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input document. Omit all arguments for interactive form mode.
    input: Option<PathBuf>,

    /// Output PDF path. Defaults to the input with a .pdf extension.
    output: Option<PathBuf>,

    /// Print a machine-readable JSON summary instead of plain text.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    // CLI and form mode share the word_to_pdf.log file.
    if let Err(e) = logging::init("word_to_pdf", cli.verbose, cli.quiet) {
        eprintln!("Failed to initialise logging: {e}");
        std::process::exit(1);
    }

    let Some(ref input) = cli.input else {
        if let Err(e) = interactive::word_pdf_form() {
            error!("Conversion failed: {e}");
            std::process::exit(1);
        }
        return;
    };

    match office::convert_single(input, cli.output.as_deref()) {
        Ok(path) => {
            info!("Conversion succeeded: {}", path.display());
            if cli.json {
                let summary = BatchResult {
                    success: vec![path],
                    failed: Vec::new(),
                    total: 1,
                };
                match serde_json::to_string_pretty(&summary) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        error!("Failed to serialise summary: {e}");
                        std::process::exit(1);
                    }
                }
            } else if !cli.quiet {
                println!("Converted: {}", path.display());
            }
        }
        Err(e) => {
            error!("Conversion failed: {e}");
            std::process::exit(1);
        }
    }
}
