//! Structured logging setup
//!
//! Command output goes to stdout, so every log line is written to stderr.

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG`, when set, takes precedence over the configured level.
pub fn init(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer(config, std::io::stderr))
        .init();
}

/// Formatting layer for `config`, writing through `writer`
fn fmt_layer<S, W>(config: &LoggingConfig, writer: W) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(config.include_target)
        .with_thread_ids(config.include_thread_ids);

    match (config.json_format, config.include_timestamps) {
        (true, true) => Box::new(layer.json().with_current_span(true).with_span_list(false)),
        (true, false) => Box::new(
            layer
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .without_time(),
        ),
        (false, true) => Box::new(layer.with_timer(fmt::time::SystemTime)),
        (false, false) => Box::new(layer.without_time()),
    }
}
