/*!
 * Wake Results
 *
 * Outcome of a notify on a wait condition.
 */

/// Result of a wake operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeResult {
    /// Successfully woke N waiters (N >= 1)
    Woken(usize),
    /// No waiters were waiting
    NoWaiters,
}

impl WakeResult {
    #[inline(always)]
    pub(crate) fn from_count(count: usize) -> Self {
        if count == 0 {
            WakeResult::NoWaiters
        } else {
            WakeResult::Woken(count)
        }
    }

    /// Get number of woken waiters (0 if none)
    #[inline(always)]
    pub fn count(&self) -> usize {
        match self {
            WakeResult::Woken(n) => *n,
            WakeResult::NoWaiters => 0,
        }
    }
}
