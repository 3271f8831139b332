/*!
 * Channel Demo - Main Entry Point
 *
 * Runs a simulated transceiver event pipeline:
 * - a polling task publishes presence changes through the writer registry
 * - a listener drains its channel with a bounded read loop
 * - shutdown closes the channel, which releases the listener
 *
 * Environment: CHANNEL_DEPTH, CHANNEL_WRITE_TIMEOUT_MS,
 * CHANNEL_READ_TIMEOUT_MS, DEMO_EVENTS (default 32), RUST_LOG,
 * CHANNEL_TRACE_JSON.
 */

use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

use stratum_channel::monitoring::span_channel;
use stratum_channel::{
    init_tracing, Channel, ChannelConfig, ChannelError, ChannelReader, ChannelWriter,
    EventWriterRegistry, Timeout,
};

/// Presence change reported by a transceiver port
#[derive(Debug, Clone)]
struct TransceiverEvent {
    slot: u32,
    port: u32,
    present: bool,
}

const POLL_INTERVAL: Duration = Duration::from_millis(5);
const SETTLE_POLLS: usize = 20;

fn main() -> Result<()> {
    init_tracing();

    let config = ChannelConfig::from_env().context("invalid channel configuration")?;
    let events: u32 = std::env::var("DEMO_EVENTS")
        .ok()
        .map(|v| v.parse::<u32>())
        .transpose()
        .context("DEMO_EVENTS must be a positive integer")?
        .unwrap_or(32);

    info!(
        depth = config.depth,
        write_timeout = %config.write_timeout,
        read_timeout = %config.read_timeout,
        events,
        "channel demo starting"
    );

    let channel = Channel::<TransceiverEvent>::create(config.depth);
    let reader = ChannelReader::create(&channel)
        .ok_or_else(|| anyhow!("channel closed before reader was created"))?;
    let writer = ChannelWriter::create(&channel)
        .ok_or_else(|| anyhow!("channel closed before writer was created"))?;

    let registry = Arc::new(EventWriterRegistry::with_config(&config));
    let writer_id = registry.register(Box::new(writer), 0)?;

    let listener = spawn_listener(reader, config.read_timeout, config.depth)?;
    let poller = spawn_poller(registry.clone(), events, config.depth)?;

    let published = poller
        .join()
        .map_err(|_| anyhow!("poller thread panicked"))?;

    // Let the listener drain what is still buffered before shutting down
    for _ in 0..SETTLE_POLLS {
        if channel.is_empty() {
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }

    info!(stats = %serde_json::to_string(&channel.stats())?, "closing channel");
    channel.close();
    // Reads fail once closed, so whatever is still buffered stays there
    let abandoned = channel.len();
    registry.unregister(writer_id)?;

    let received = listener
        .join()
        .map_err(|_| anyhow!("listener thread panicked"))?;

    info!(published, received, abandoned, "channel demo finished");
    Ok(())
}

fn spawn_poller(
    registry: Arc<EventWriterRegistry<TransceiverEvent>>,
    events: u32,
    depth: usize,
) -> Result<thread::JoinHandle<usize>> {
    thread::Builder::new()
        .name("transceiver-poller".into())
        .spawn(move || {
            let span = span_channel("transceiver-events", depth);
            let _entered = span.enter();

            let mut published = 0;
            for i in 0..events {
                let event = TransceiverEvent {
                    slot: 1,
                    port: i % 8 + 1,
                    present: i % 2 == 0,
                };
                let report = registry.publish(&event);
                published += report.delivered;
                if !report.is_complete() {
                    warn!(
                        ?event,
                        failed = report.failed,
                        pruned = report.pruned.len(),
                        "event not delivered everywhere"
                    );
                }
                thread::sleep(POLL_INTERVAL);
            }
            published
        })
        .context("failed to spawn poller thread")
}

fn spawn_listener(
    reader: ChannelReader<TransceiverEvent>,
    timeout: Timeout,
    depth: usize,
) -> Result<thread::JoinHandle<usize>> {
    thread::Builder::new()
        .name("transceiver-listener".into())
        .spawn(move || {
            let span = span_channel("transceiver-events", depth);
            let _entered = span.enter();

            let mut received = 0;
            loop {
                match reader.read(timeout) {
                    Ok(event) => {
                        received += 1;
                        info!(
                            slot = event.slot,
                            port = event.port,
                            present = event.present,
                            "transceiver event"
                        );
                    }
                    // Nothing arrived within the timeout; poll again
                    Err(ChannelError::NotFound(_)) => continue,
                    Err(ChannelError::Cancelled) => break,
                    Err(e) => {
                        warn!(error = %e, "listener stopping on unexpected error");
                        break;
                    }
                }
            }
            received
        })
        .context("failed to spawn listener thread")
}
