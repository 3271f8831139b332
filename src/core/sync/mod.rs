/*!
 * Synchronization Primitives
 *
 * Wait/notify building blocks for monitor-style data structures: a
 * condition bound to the caller's `parking_lot::Mutex` that waits with a
 * deadline and reports how many threads a notify reached.
 */

mod condvar;
mod traits;

pub use condvar::WaitCondition;
pub use traits::WakeResult;
