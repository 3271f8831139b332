/*!
 * Channel Types
 * Error categories and statistics for channels
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;

/// Channel operation result
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Channel error categories with miette diagnostics
///
/// Every operation reports one of these directly to its caller. The channel
/// never retries on its own; treating `NotFound` or `ResourceExhausted` as
/// "try again" is the caller's decision.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum ChannelError {
    /// The channel has been closed
    #[error("Channel is closed")]
    #[diagnostic(
        code(channel::cancelled),
        help("The channel was closed and can no longer transfer messages. Stop using this handle.")
    )]
    Cancelled,

    /// No room for the message within the allowed time
    #[error("Channel resource exhausted: {0}")]
    #[diagnostic(
        code(channel::resource_exhausted),
        help("The channel is at its maximum depth. Retry later, use a longer timeout, or drain the reader side faster.")
    )]
    ResourceExhausted(Cow<'static, str>),

    /// No message arrived within the allowed time
    #[error("Channel entry not found: {0}")]
    #[diagnostic(
        code(channel::not_found),
        help("The channel was empty for the whole timeout. Poll again if more messages are expected.")
    )]
    NotFound(Cow<'static, str>),

    /// Queue load exceeded the configured depth
    #[error("Channel load {load} exceeds max queue depth {depth}")]
    #[diagnostic(
        code(channel::internal),
        help("The channel's internal bookkeeping is inconsistent. This is a bug in the channel, not in the caller.")
    )]
    Internal { load: usize, depth: usize },
}

impl ChannelError {
    /// Check if the channel was closed
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ChannelError::Cancelled)
    }

    /// Check if the same call may succeed later on an open channel
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ChannelError::ResourceExhausted(_) | ChannelError::NotFound(_)
        )
    }
}

/// Point-in-time channel statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChannelStats {
    /// Maximum queue depth
    pub depth: usize,
    /// Messages currently buffered
    pub length: usize,
    pub closed: bool,
    /// Successful enqueues since creation
    pub enqueued: u64,
    /// Messages handed to readers since creation (single and bulk reads)
    pub dequeued: u64,
    /// Writers parked waiting for space
    pub waiting_writers: usize,
    /// Readers parked waiting for data
    pub waiting_readers: usize,
}
