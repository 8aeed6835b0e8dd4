//! Logging setup for the CLI.
//!
//! Structured logging via `tracing`, written to stderr so stdout stays
//! clean for tag output. `RUST_LOG` overrides everything else.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber.
///
/// The level comes from `RUST_LOG` if set, otherwise from the config
/// file's `logging.level`, with `--verbose` forcing debug. `--json-logs`
/// or `logging.format = "json"` switches to machine-readable output.
pub fn init(config: &taggr_core::Config, verbose: bool, json_logs: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let json = json_logs || config.logging.format == "json";
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}
