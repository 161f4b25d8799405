//! Tracing subscriber setup for the command-line binary.

use tracing_subscriber::EnvFilter;

/// Installs a formatted tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the crate logs at `info`, raised to
/// `debug` for one `-v` and `trace` for two or more.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wds_tariff_sim={level}")));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
