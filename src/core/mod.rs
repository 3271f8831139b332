/*!
 * Core Module
 * Timeouts, limits and the wait/notify primitives the channel is built on
 */

pub mod limits;
pub mod sync;
pub mod timeout;

// Re-export for convenience
pub use sync::{WaitCondition, WakeResult};
pub use timeout::{Deadline, Timeout};
