//! Sets up the global tracing subscriber for the binaries.

use std::{fs::OpenOptions, io, path::Path, sync::Arc};

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

/// The log filter used when `RUST_LOG` is not set.
///
/// Kept at `warn` so log lines do not get mixed in with listings.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Log to stderr, and to `log_file` at the debug level if one is given.
///
/// The stderr log level is read from the `RUST_LOG` environment variable and
/// defaults to [DEFAULT_LOG_FILTER]. The log file is appended to.
///
/// # Errors
/// Returns an error if the log file cannot be opened.
///
/// # Panics
/// Panics if a global subscriber has already been set.
pub fn setup_logging(log_file: Option<&Path>) -> io::Result<()> {
    let stderr_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(stderr_filter);

    let debug_log = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .with_filter(filter::LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .init();

    Ok(())
}
