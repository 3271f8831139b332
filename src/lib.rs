/*!
 * Stratum Channel Library
 * Bounded, thread-safe FIFO channels for intra-process message passing
 */

pub mod channel;
pub mod config;
pub mod core;
pub mod monitoring;
pub mod registry;

// Re-exports
pub use channel::{
    Channel, ChannelError, ChannelReader, ChannelResult, ChannelStats, ChannelWriter,
    MessageReader, MessageWriter,
};
pub use config::{ChannelConfig, ConfigError};
pub use crate::core::{Deadline, Timeout};
pub use monitoring::init_tracing;
pub use registry::{EventWriterRegistry, PublishReport, RegistryError, WriterId};
