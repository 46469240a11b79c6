//! Subscriber setup
//!
//! Logs go to stderr; stdout carries only the JSON result.

use std::io::IsTerminal;

use tracing_subscriber::filter::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` wins over `default_level`.
pub(crate) fn init_tracing(default_level: &str, json: bool) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.with_ansi(std::io::stderr().is_terminal()).try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
