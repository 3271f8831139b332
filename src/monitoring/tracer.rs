/*!
 * Structured Tracing
 * Subscriber setup and span helpers built on the tracing crate
 */

use tracing::{info, span, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Environment switch for JSON log output
pub const TRACE_JSON_ENV: &str = "CHANNEL_TRACE_JSON";

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - CHANNEL_TRACE_JSON: Enable JSON output (default: false)
///
/// Panics if a global subscriber is already installed; call once from `main`.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(TRACE_JSON_ENV)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        // One JSON object per event, for log shippers
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
        info!("Structured tracing initialized with JSON output");
    } else {
        // Single-line text for terminals
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .init();
        info!("Structured tracing initialized");
    }
}

/// Span covering the lifetime of one named channel
///
/// Enter it on producer and consumer threads so their events carry the
/// channel name and depth.
pub fn span_channel(name: &str, depth: usize) -> Span {
    span!(Level::INFO, "channel", channel = name, depth)
}
