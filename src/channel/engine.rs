/*!
 * Channel Engine
 *
 * Bounded FIFO queue shared by any number of writer and reader handles.
 *
 * # Locking
 *
 * One mutex guards the queue, the closed flag and the counters. Two wait
 * conditions are bound to it: `not_empty` parks readers and `not_full`
 * parks writers. Every wait re-checks its predicate after waking, and every
 * operation checks the closed flag before looking at the queue, so a closed
 * channel never transfers another message even if items remain buffered.
 *
 * # Ownership
 *
 * `Channel::create` returns an `Arc`. Each handle holds its own clone, so
 * the channel lives until the creator and every handle have been dropped.
 */

use super::reader::ChannelReader;
use super::types::{ChannelError, ChannelResult, ChannelStats};
use super::writer::ChannelWriter;
use crate::core::limits::MAX_PREALLOCATED_SLOTS;
use crate::core::sync::WaitCondition;
use crate::core::timeout::{Deadline, Timeout};
use parking_lot::{Mutex, MutexGuard};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, error, trace};

/// State guarded by the channel lock
struct State<T> {
    queue: VecDeque<T>,
    closed: bool,
    enqueued: u64,
    dequeued: u64,
}

/// Bounded, thread-safe FIFO channel
///
/// Messages are written through [`ChannelWriter`]s and read through
/// [`ChannelReader`]s. The channel itself only exposes lifecycle and
/// inspection operations.
pub struct Channel<T> {
    state: Mutex<State<T>>,
    /// Signalled when a message is enqueued
    not_empty: WaitCondition,
    /// Signalled when one or more slots are freed
    not_full: WaitCondition,
    depth: usize,
}

impl<T> Channel<T> {
    /// Create a channel buffering at most `depth` messages
    ///
    /// A depth of zero is accepted and yields a channel that is always full.
    pub fn create(depth: usize) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                queue: VecDeque::with_capacity(depth.min(MAX_PREALLOCATED_SLOTS)),
                closed: false,
                enqueued: 0,
                dequeued: 0,
            }),
            not_empty: WaitCondition::new(),
            not_full: WaitCondition::new(),
            depth,
        })
    }

    /// Close the channel
    ///
    /// Wakes every blocked reader and writer; they and all later calls fail
    /// with [`ChannelError::Cancelled`]. Returns `false` if the channel was
    /// already closed.
    pub fn close(&self) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        state.closed = true;

        let writers = self.not_full.notify_all();
        let readers = self.not_empty.notify_all();
        debug!(
            depth = self.depth,
            abandoned = state.queue.len(),
            woken_writers = writers.count(),
            woken_readers = readers.count(),
            "channel closed"
        );
        true
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Maximum number of buffered messages
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of buffered messages
    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().queue.is_empty()
    }

    pub fn stats(&self) -> ChannelStats {
        let state = self.state.lock();
        ChannelStats {
            depth: self.depth,
            length: state.queue.len(),
            closed: state.closed,
            enqueued: state.enqueued,
            dequeued: state.dequeued,
            waiting_writers: self.not_full.waiter_count(),
            waiting_readers: self.not_empty.waiter_count(),
        }
    }

    /// Create a writer handle for this channel (`None` once closed)
    pub fn writer(self: &Arc<Self>) -> Option<ChannelWriter<T>> {
        ChannelWriter::create(self)
    }

    /// Create a reader handle for this channel (`None` once closed)
    pub fn reader(self: &Arc<Self>) -> Option<ChannelReader<T>> {
        ChannelReader::create(self)
    }

    /// Enqueue `value`, waiting up to `timeout` for space
    pub(crate) fn write(&self, value: T, timeout: Timeout) -> ChannelResult<()> {
        let deadline = timeout.deadline();
        let mut state = self.state.lock();
        self.wait_for_space(&mut state, deadline, timeout)?;
        self.push(&mut state, value);
        Ok(())
    }

    /// Enqueue `value` only if there is space right now
    pub(crate) fn try_write(&self, value: T) -> ChannelResult<()> {
        let mut state = self.state.lock();
        self.check_write_state(&state)?;
        self.push(&mut state, value);
        Ok(())
    }

    /// Dequeue the oldest message, waiting up to `timeout` for one to arrive
    pub(crate) fn read(&self, timeout: Timeout) -> ChannelResult<T> {
        let deadline = timeout.deadline();
        let mut state = self.state.lock();
        // Once closed nothing signals not_empty for this caller again
        if state.closed {
            return Err(ChannelError::Cancelled);
        }

        loop {
            if let Some(value) = self.pop(&mut state) {
                return Ok(value);
            }

            let expired = self.not_empty.wait(&mut state, deadline);
            if state.closed {
                return Err(ChannelError::Cancelled);
            }
            // A message may have arrived together with the timeout
            if expired && state.queue.is_empty() {
                trace!(timeout = %timeout, "channel read timed out");
                return Err(ChannelError::NotFound(
                    "Read did not succeed within timeout due to empty Channel.".into(),
                ));
            }
        }
    }

    /// Dequeue the oldest message only if one is buffered right now
    pub(crate) fn try_read(&self) -> ChannelResult<T> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(ChannelError::Cancelled);
        }
        self.pop(&mut state)
            .ok_or_else(|| ChannelError::NotFound("Channel is empty.".into()))
    }

    /// Move every buffered message out, oldest first
    pub(crate) fn read_all(&self) -> ChannelResult<Vec<T>> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(ChannelError::Cancelled);
        }

        let drained: Vec<T> = state.queue.drain(..).collect();
        state.dequeued += drained.len() as u64;
        // Many slots may have been freed at once
        self.not_full.notify_all();
        Ok(drained)
    }

    /// Check closure and wait until a slot is free or the deadline passes
    fn wait_for_space(
        &self,
        state: &mut MutexGuard<'_, State<T>>,
        deadline: Deadline,
        timeout: Timeout,
    ) -> ChannelResult<()> {
        // Once closed nothing signals not_full for this caller again
        if state.closed {
            return Err(ChannelError::Cancelled);
        }

        while state.queue.len() == self.depth {
            let expired = self.not_full.wait(state, deadline);
            if state.closed {
                return Err(ChannelError::Cancelled);
            }
            // A slot may have been freed together with the timeout
            if expired && state.queue.len() == self.depth {
                trace!(timeout = %timeout, depth = self.depth, "channel write timed out");
                return Err(ChannelError::ResourceExhausted(
                    "Write did not succeed within timeout due to full Channel.".into(),
                ));
            }
        }

        self.check_load(state)
    }

    /// Non-blocking counterpart of `wait_for_space`
    fn check_write_state(&self, state: &State<T>) -> ChannelResult<()> {
        if state.closed {
            return Err(ChannelError::Cancelled);
        }
        if state.queue.len() == self.depth {
            return Err(ChannelError::ResourceExhausted("Channel is full.".into()));
        }
        self.check_load(state)
    }

    /// Queue load must never exceed the depth
    fn check_load(&self, state: &State<T>) -> ChannelResult<()> {
        let load = state.queue.len();
        if load > self.depth {
            error!(load, depth = self.depth, "channel load exceeds max queue depth");
            return Err(ChannelError::Internal {
                load,
                depth: self.depth,
            });
        }
        Ok(())
    }

    fn push(&self, state: &mut State<T>, value: T) {
        state.queue.push_back(value);
        state.enqueued += 1;
        // Only one new message, so only one reader can make progress
        self.not_empty.notify_one();
    }

    fn pop(&self, state: &mut State<T>) -> Option<T> {
        let value = state.queue.pop_front()?;
        state.dequeued += 1;
        self.not_full.notify_one();
        Some(value)
    }
}

impl<T> std::fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Channel")
            .field("depth", &self.depth)
            .field("length", &state.queue.len())
            .field("closed", &state.closed)
            .finish()
    }
}
