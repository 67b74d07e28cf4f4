//! Logging setup for the CLI tools.
//!
//! Configured exactly once per process, at binary start. Every tool writes
//! an append-only `{tool}.log` next to the working directory with the line
//! format `timestamp - LEVEL - message`, and mirrors the same lines to
//! stderr. The only persisted state any pipeline keeps, besides its output
//! files, is this log.

use crate::error::ConvertError;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// `timestamp - LEVEL - message`, one event per line.
struct PlainLine;

impl<S, N> FormatEvent<S, N> for PlainLine
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'w> FormatFields<'w> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        SystemTime.format_time(&mut writer)?;
        write!(writer, " - {} - ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Initialise logging for `tool`: an `EnvFilter` honouring `RUST_LOG`, a
/// `{tool}.log` append-only file layer, and a stderr mirror.
///
/// `verbose` lowers the default filter to `debug`; `quiet` raises it to
/// `error`. Calling this twice returns an error, so each binary calls it
/// exactly once.
pub fn init(tool: &str, verbose: bool, quiet: bool) -> Result<(), ConvertError> {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let log_path = PathBuf::from(format!("{tool}.log"));
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| ConvertError::OutputWrite {
            path: log_path,
            source: e,
        })?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .event_format(PlainLine)
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .with(
            fmt::layer()
                .event_format(PlainLine)
                .with_ansi(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| ConvertError::Internal(format!("logging already initialised: {e}")))?;

    Ok(())
}
