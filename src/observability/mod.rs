//! Structured logging setup.
//!
//! - [`init_logging`]: one-time subscriber install with `RUST_LOG` support
//! - [`init_logging_verbose`]: same, defaulting to debug for this crate

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "leadquery=info";
pub const VERBOSE_FILTER: &str = "leadquery=debug";

/// Initialize structured logging with `RUST_LOG` environment variable support.
///
/// Defaults to `leadquery=info` when `RUST_LOG` is not set. Output goes to
/// stderr so that `--json` output on stdout stays machine-readable.
/// Subsequent calls are silently ignored by `tracing_subscriber`.
pub fn init_logging() {
    init_with_default(DEFAULT_FILTER);
}

/// Like [`init_logging`], but defaults to `leadquery=debug`.
pub fn init_logging_verbose() {
    init_with_default(VERBOSE_FILTER);
}

fn init_with_default(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // try_init so double-init in tests doesn't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
