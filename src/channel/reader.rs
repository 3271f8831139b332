/*!
 * Channel Reader
 * Read-only handle onto a shared channel
 */

use super::engine::Channel;
use super::traits::MessageReader;
use super::types::ChannelResult;
use crate::core::timeout::Timeout;
use std::sync::Arc;
use tracing::debug;

/// Read-only handle holding a share of a [`Channel`]
///
/// Several readers may drain the same channel concurrently; each message
/// goes to exactly one of them. With more than one reader the order in
/// which messages are *processed* can differ from the order they were
/// sent, so a single reader per channel is the usual setup.
pub struct ChannelReader<T> {
    channel: Arc<Channel<T>>,
}

impl<T> ChannelReader<T> {
    /// Create a reader for `channel`
    ///
    /// Returns `None` if the channel is already closed.
    pub fn create(channel: &Arc<Channel<T>>) -> Option<Self> {
        if channel.is_closed() {
            debug!(depth = channel.depth(), "refusing reader for closed channel");
            return None;
        }
        Some(Self {
            channel: Arc::clone(channel),
        })
    }

    /// Create a reader from an optional channel reference
    ///
    /// Returns `None` if the reference is absent or the channel is closed.
    pub fn create_from(channel: Option<Arc<Channel<T>>>) -> Option<Self> {
        channel.as_ref().and_then(Self::create)
    }

    /// Dequeue the oldest message, blocking up to `timeout` while empty
    ///
    /// # Errors
    ///
    /// - `Cancelled` if the channel is or becomes closed, even when messages
    ///   are still buffered
    /// - `NotFound` if the channel stayed empty for the whole timeout
    #[inline]
    pub fn read(&self, timeout: Timeout) -> ChannelResult<T> {
        self.channel.read(timeout)
    }

    /// Dequeue the oldest message without blocking
    #[inline]
    pub fn try_read(&self) -> ChannelResult<T> {
        self.channel.try_read()
    }

    /// Take every buffered message, oldest first
    ///
    /// Succeeds with an empty vector when nothing is buffered.
    #[inline]
    pub fn read_all(&self) -> ChannelResult<Vec<T>> {
        self.channel.read_all()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.channel.is_closed()
    }
}

impl<T: Send> MessageReader<T> for ChannelReader<T> {
    fn read(&self, timeout: Timeout) -> ChannelResult<T> {
        ChannelReader::read(self, timeout)
    }

    fn try_read(&self) -> ChannelResult<T> {
        ChannelReader::try_read(self)
    }

    fn read_all(&self) -> ChannelResult<Vec<T>> {
        ChannelReader::read_all(self)
    }

    fn is_closed(&self) -> bool {
        ChannelReader::is_closed(self)
    }
}

impl<T> std::fmt::Debug for ChannelReader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelReader")
            .field("channel", &self.channel)
            .finish()
    }
}
