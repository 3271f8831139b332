/*!
 * Registry Manager
 * Registration bookkeeping and priority-ordered publishing
 */

use super::types::{PublishReport, RegistryError, RegistryResult, WriterId};
use crate::channel::{ChannelError, MessageWriter};
use crate::config::ChannelConfig;
use crate::core::limits::DEFAULT_PUBLISH_TIMEOUT;
use crate::core::timeout::Timeout;
use ahash::RandomState;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A registered writer and its delivery priority
struct Registration<T> {
    priority: i32,
    writer: Arc<dyn MessageWriter<T>>,
}

/// Registry of event writers keyed by [`WriterId`]
///
/// Writers are never held borrowed from the map while publishing, so a
/// writer blocked on a full channel does not stall registration.
pub struct EventWriterRegistry<T> {
    writers: DashMap<WriterId, Registration<T>, RandomState>,
    next_id: AtomicU64,
    write_timeout: Timeout,
}

impl<T: Clone> EventWriterRegistry<T> {
    /// Create a registry that waits up to `write_timeout` per writer
    pub fn new(write_timeout: Timeout) -> Self {
        Self {
            writers: DashMap::with_hasher(RandomState::new()),
            next_id: AtomicU64::new(1),
            write_timeout,
        }
    }

    /// Create a registry using the configured write timeout
    pub fn with_config(config: &ChannelConfig) -> Self {
        Self::new(config.write_timeout)
    }

    /// Register `writer` with `priority` (higher receives events first)
    ///
    /// # Errors
    ///
    /// `Closed` if the writer's channel is already closed.
    pub fn register(
        &self,
        writer: Box<dyn MessageWriter<T>>,
        priority: i32,
    ) -> RegistryResult<WriterId> {
        if writer.is_closed() {
            return Err(RegistryError::Closed);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.writers.insert(
            id,
            Registration {
                priority,
                writer: Arc::from(writer),
            },
        );
        info!(writer_id = id, priority, "event writer registered");
        Ok(id)
    }

    /// Remove the writer registered under `id`
    pub fn unregister(&self, id: WriterId) -> RegistryResult<()> {
        self.writers
            .remove(&id)
            .map(|_| info!(writer_id = id, "event writer unregistered"))
            .ok_or(RegistryError::NotFound(id))
    }

    /// Write a copy of `event` to every registered writer
    ///
    /// Writers are visited by descending priority, then by registration
    /// order. A writer whose channel has closed is unregistered; any other
    /// failure is counted and the writer stays registered.
    pub fn publish(&self, event: &T) -> PublishReport {
        let mut report = PublishReport::default();

        for (id, writer) in self.ordered_writers() {
            match writer.write(event.clone(), self.write_timeout) {
                Ok(()) => report.delivered += 1,
                Err(ChannelError::Cancelled) => {
                    self.writers.remove(&id);
                    debug!(writer_id = id, "pruned event writer with closed channel");
                    report.pruned.push(id);
                }
                Err(e) => {
                    warn!(writer_id = id, error = %e, "failed to deliver event");
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Snapshot of the registered writers in delivery order
    fn ordered_writers(&self) -> Vec<(WriterId, Arc<dyn MessageWriter<T>>)> {
        let mut entries: Vec<(i32, WriterId, Arc<dyn MessageWriter<T>>)> = self
            .writers
            .iter()
            .map(|entry| {
                let registration = entry.value();
                (
                    registration.priority,
                    *entry.key(),
                    Arc::clone(&registration.writer),
                )
            })
            .collect();

        entries.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        entries
            .into_iter()
            .map(|(_, id, writer)| (id, writer))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.writers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }

    /// Unregister every writer
    pub fn clear(&self) {
        self.writers.clear();
    }

    pub fn write_timeout(&self) -> Timeout {
        self.write_timeout
    }
}

impl<T: Clone> Default for EventWriterRegistry<T> {
    fn default() -> Self {
        Self::new(Timeout::After(DEFAULT_PUBLISH_TIMEOUT))
    }
}
