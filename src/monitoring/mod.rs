/*!
 * Monitoring
 * Structured logging setup
 */

mod tracer;

pub use tracer::{init_tracing, span_channel, TRACE_JSON_ENV};
