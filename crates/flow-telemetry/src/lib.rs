//! Log output for applications embedding the Flow adapters
//!
//! The adapters only emit `tracing` events; this crate installs the
//! subscriber that renders them.

use flow_config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global `tracing` subscriber described by `config`
///
/// An unparsable filter falls back to `info` with a warning once the
/// subscriber is live.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let (filter, rejected) = build_filter(&config.filter);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Pretty => registry.with(fmt_layer).try_init(),
        LogFormat::Json => registry.with(fmt_layer.json()).try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    if let Some(directive) = rejected {
        tracing::warn!(filter = %directive, "invalid log filter, using `info`");
    }

    Ok(())
}

/// Parse a filter directive, returning the rejected input on failure
fn build_filter(directive: &str) -> (EnvFilter, Option<String>) {
    match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(_) => (EnvFilter::new("info"), Some(directive.to_owned())),
    }
}
