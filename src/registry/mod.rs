/*!
 * Event Writer Registry
 *
 * Fan-out point for hardware-style event sources: listeners register a
 * channel writer with a priority, the source publishes each event once and
 * the registry copies it into every registered channel, highest priority
 * first.
 */

mod manager;
mod types;

// Re-export public API
pub use manager::EventWriterRegistry;
pub use types::{PublishReport, RegistryError, RegistryResult, WriterId};
