/*!
 * Registry Types
 * Identifiers, errors and publish reports for the event writer registry
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier handed out when a writer is registered
pub type WriterId = u64;

/// Registry operation result
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry errors with miette diagnostics
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum RegistryError {
    /// No writer is registered under this id
    #[error("Event writer {0} not found")]
    #[diagnostic(
        code(registry::not_found),
        help("The writer was never registered, was already unregistered, or was pruned after its channel closed.")
    )]
    NotFound(WriterId),

    /// The writer's channel is already closed
    #[error("Cannot register writer for a closed channel")]
    #[diagnostic(
        code(registry::closed),
        help("Create a new channel and writer before registering.")
    )]
    Closed,
}

/// Outcome of publishing one event to every registered writer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PublishReport {
    /// Writers that accepted the event
    pub delivered: usize,
    /// Writers that rejected it but stay registered (full, timed out, ...)
    pub failed: usize,
    /// Writers removed because their channel was closed
    pub pruned: Vec<WriterId>,
}

impl PublishReport {
    /// Check if every registered writer accepted the event
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.pruned.is_empty()
    }
}
