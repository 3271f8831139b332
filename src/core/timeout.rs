/*!
 * Channel Timeouts
 *
 * Caller-facing timeout values for blocking channel operations.
 *
 * ## Timeout Forms
 *
 * - **Infinite**: block until the condition holds or the channel closes
 * - **After(d)**: block for at most `d`, then fail
 * - **IMMEDIATE**: a zero `After`, fails on the first unsatisfied check
 *
 * A timeout is turned into a [`Deadline`] exactly once when an operation
 * starts, so wakeups that do not satisfy the predicate never extend the
 * total time spent waiting.
 */

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// How long a blocking channel operation may wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "duration")]
pub enum Timeout {
    /// Wait indefinitely (only `close()` or progress ends the wait)
    Infinite,
    /// Wait at most this long
    After(Duration),
}

impl Timeout {
    /// Do not wait at all
    pub const IMMEDIATE: Self = Self::After(Duration::ZERO);

    /// Finite timeout in milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self::After(Duration::from_millis(ms))
    }

    /// Finite timeout in seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self::After(Duration::from_secs(secs))
    }

    /// Get the duration for this timeout (`None` when unbounded)
    pub const fn duration(&self) -> Option<Duration> {
        match self {
            Self::Infinite => None,
            Self::After(d) => Some(*d),
        }
    }

    #[inline]
    pub const fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite)
    }

    /// Resolve to an absolute deadline starting now
    #[inline]
    pub fn deadline(&self) -> Deadline {
        self.deadline_from(Instant::now())
    }

    /// Resolve to an absolute deadline starting at `start`
    ///
    /// A duration too large to be represented as an `Instant` is treated
    /// as unbounded.
    pub fn deadline_from(&self, start: Instant) -> Deadline {
        match self {
            Self::Infinite => Deadline::Never,
            Self::After(d) => start
                .checked_add(*d)
                .map(Deadline::At)
                .unwrap_or(Deadline::Never),
        }
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Self::Infinite
    }
}

impl From<Duration> for Timeout {
    fn from(d: Duration) -> Self {
        Self::After(d)
    }
}

impl From<Option<Duration>> for Timeout {
    fn from(d: Option<Duration>) -> Self {
        d.map(Self::After).unwrap_or(Self::Infinite)
    }
}

impl std::fmt::Display for Timeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Infinite => write!(f, "infinite"),
            Self::After(d) => write!(f, "{}ms", d.as_millis()),
        }
    }
}

/// Absolute point in time at which a wait gives up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    Never,
    At(Instant),
}

impl Deadline {
    /// Check if the deadline has passed
    pub fn is_expired(&self) -> bool {
        match self {
            Self::Never => false,
            Self::At(at) => Instant::now() >= *at,
        }
    }
}
