/*!
 * Channel Handle Traits
 * Capability interfaces implemented by writer and reader handles
 */

use super::types::ChannelResult;
use crate::core::timeout::Timeout;

/// Send side of a channel
///
/// Implemented by [`ChannelWriter`](super::ChannelWriter). Components that
/// only produce messages should accept this trait so tests can substitute
/// their own sink.
pub trait MessageWriter<T>: Send + Sync {
    /// Enqueue a message, blocking up to `timeout` while the channel is full
    fn write(&self, value: T, timeout: Timeout) -> ChannelResult<()>;

    /// Enqueue a message without blocking
    fn try_write(&self, value: T) -> ChannelResult<()>;

    fn is_closed(&self) -> bool;
}

/// Receive side of a channel
pub trait MessageReader<T>: Send + Sync {
    /// Dequeue a message, blocking up to `timeout` while the channel is empty
    fn read(&self, timeout: Timeout) -> ChannelResult<T>;

    /// Dequeue a message without blocking
    fn try_read(&self) -> ChannelResult<T>;

    /// Dequeue every buffered message in order
    fn read_all(&self) -> ChannelResult<Vec<T>>;

    fn is_closed(&self) -> bool;
}
