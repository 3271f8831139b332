/*!
 * Channel Module
 *
 * Bounded FIFO channels for typed message passing between threads of one
 * process.
 *
 * A [`Channel`] is created with a fixed depth and shared through
 * [`ChannelWriter`] and [`ChannelReader`] handles. Closing the channel is the
 * only way to release blocked handles; after that every operation fails with
 * [`ChannelError::Cancelled`].
 *
 * ```
 * use stratum_channel::{Channel, ChannelReader, ChannelWriter, Timeout};
 *
 * let channel = Channel::<u32>::create(128);
 * let writer = ChannelWriter::create(&channel).unwrap();
 * let reader = ChannelReader::create(&channel).unwrap();
 *
 * writer.write(7, Timeout::from_millis(10)).unwrap();
 * assert_eq!(reader.read(Timeout::Infinite).unwrap(), 7);
 *
 * channel.close();
 * assert!(reader.try_read().unwrap_err().is_cancelled());
 * ```
 */

mod engine;
mod reader;
mod traits;
mod types;
mod writer;

// Re-export public API
pub use engine::Channel;
pub use reader::ChannelReader;
pub use traits::{MessageReader, MessageWriter};
pub use types::{ChannelError, ChannelResult, ChannelStats};
pub use writer::ChannelWriter;
