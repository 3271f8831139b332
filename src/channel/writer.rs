/*!
 * Channel Writer
 * Write-only handle onto a shared channel
 */

use super::engine::Channel;
use super::traits::MessageWriter;
use super::types::ChannelResult;
use crate::core::timeout::Timeout;
use std::sync::Arc;
use tracing::debug;

/// Write-only handle holding a share of a [`Channel`]
///
/// Not `Clone`: every additional writer is created from the channel so a
/// closed channel never hands out new handles.
pub struct ChannelWriter<T> {
    channel: Arc<Channel<T>>,
}

impl<T> ChannelWriter<T> {
    /// Create a writer for `channel`
    ///
    /// Returns `None` if the channel is already closed.
    pub fn create(channel: &Arc<Channel<T>>) -> Option<Self> {
        if channel.is_closed() {
            debug!(depth = channel.depth(), "refusing writer for closed channel");
            return None;
        }
        Some(Self {
            channel: Arc::clone(channel),
        })
    }

    /// Create a writer from an optional channel reference
    ///
    /// Returns `None` if the reference is absent or the channel is closed.
    pub fn create_from(channel: Option<Arc<Channel<T>>>) -> Option<Self> {
        channel.as_ref().and_then(Self::create)
    }

    /// Enqueue `value`, blocking up to `timeout` while the channel is full
    ///
    /// # Errors
    ///
    /// - `Cancelled` if the channel is or becomes closed
    /// - `ResourceExhausted` if the channel stayed full for the whole timeout
    #[inline]
    pub fn write(&self, value: T, timeout: Timeout) -> ChannelResult<()> {
        self.channel.write(value, timeout)
    }

    /// Enqueue `value` without blocking
    ///
    /// Fails with `ResourceExhausted` immediately if the channel is full.
    #[inline]
    pub fn try_write(&self, value: T) -> ChannelResult<()> {
        self.channel.try_write(value)
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.channel.is_closed()
    }
}

impl<T: Send> MessageWriter<T> for ChannelWriter<T> {
    fn write(&self, value: T, timeout: Timeout) -> ChannelResult<()> {
        ChannelWriter::write(self, value, timeout)
    }

    fn try_write(&self, value: T) -> ChannelResult<()> {
        ChannelWriter::try_write(self, value)
    }

    fn is_closed(&self) -> bool {
        ChannelWriter::is_closed(self)
    }
}

impl<T> std::fmt::Debug for ChannelWriter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelWriter")
            .field("channel", &self.channel)
            .finish()
    }
}
