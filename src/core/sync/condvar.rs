/*!
 * Deadline-Aware Wait Condition
 *
 * A `parking_lot::Condvar` paired with a waiter count. The condition does
 * not own a mutex: callers wait with the guard of the lock that protects
 * their state, which is released while parked and re-acquired before the
 * wait returns.
 *
 * Waits may end without a notify (spurious wakeups, or a notify meant for a
 * predicate that another thread consumed first). Callers must re-check
 * their predicate in a loop after every return.
 */

use super::traits::WakeResult;
use crate::core::timeout::Deadline;
use parking_lot::{Condvar, MutexGuard};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Condition signal bound to an external mutex
#[derive(Debug, Default)]
pub struct WaitCondition {
    condvar: Condvar,
    waiters: AtomicUsize,
}

impl WaitCondition {
    pub const fn new() -> Self {
        Self {
            condvar: Condvar::new(),
            waiters: AtomicUsize::new(0),
        }
    }

    /// Park the calling thread until notified or `deadline` passes
    ///
    /// Returns `true` if the wait ended because the deadline passed. A
    /// deadline already in the past returns `true` without parking.
    pub fn wait<S>(&self, guard: &mut MutexGuard<'_, S>, deadline: Deadline) -> bool {
        if deadline.is_expired() {
            return true;
        }

        self.waiters.fetch_add(1, Ordering::Relaxed);
        let timed_out = match deadline {
            Deadline::Never => {
                self.condvar.wait(guard);
                false
            }
            Deadline::At(at) => self.condvar.wait_until(guard, at).timed_out(),
        };
        self.waiters.fetch_sub(1, Ordering::Relaxed);

        timed_out
    }

    /// Wake a single waiter, if any
    #[inline]
    pub fn notify_one(&self) -> WakeResult {
        WakeResult::from_count(usize::from(self.condvar.notify_one()))
    }

    /// Wake every current waiter
    #[inline]
    pub fn notify_all(&self) -> WakeResult {
        WakeResult::from_count(self.condvar.notify_all())
    }

    /// Number of threads currently parked on this condition
    ///
    /// Exact when read while holding the associated lock.
    pub fn waiter_count(&self) -> usize {
        self.waiters.load(Ordering::Relaxed)
    }
}
