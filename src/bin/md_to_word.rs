//! CLI entry point for Markdown→Word conversion.
//!
//! A thin shim over the library: maps positional arguments to
//! [`paperlift::convert_markdown_to_docx`] and exit codes.

use clap::Parser;
use paperlift::{logging, markdown};
use std::path::PathBuf;
use tracing::{error, info};

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert next to the input (notes.md -> notes.docx)
  md_to_word notes.md

  # Convert to an explicit path
  md_to_word notes.md out/report.docx

ENGINE:
  Pandoc is probed on first run; if missing, a private copy is downloaded
  once to ~/.cache/paperlift/. Override with PANDOC_PATH=/path/to/pandoc.

EXIT CODES:
  0  success
  1  conversion failed (details in md_to_word.log)
  2  usage error
"#;

/// Convert a Markdown file to a Word (.docx) document using pandoc.
#[derive(Parser, Debug)]
#[command(
    name = "md_to_word",
    version,
    about = "Convert a Markdown file to a Word (.docx) document using pandoc",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input Markdown file (.md / .markdown).
    input: PathBuf,

    /// Output .docx path. Defaults to the input with a .docx extension.
    output: Option<PathBuf>,

    /// Enable DEBUG-level logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init("md_to_word", cli.verbose, cli.quiet) {
        eprintln!("Failed to initialise logging: {e}");
        std::process::exit(1);
    }

    match markdown::convert_markdown_to_docx(&cli.input, cli.output.as_deref()) {
        Ok(path) => {
            info!("Conversion succeeded: {}", path.display());
            if !cli.quiet {
                println!("Converted: {}", path.display());
            }
        }
        Err(e) => {
            error!("Conversion failed: {e}");
            std::process::exit(1);
        }
    }
}
