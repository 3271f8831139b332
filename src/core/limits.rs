/*!
 * Channel Limits and Defaults
 *
 * Centralized location for channel sizing and timeout defaults.
 */

use std::time::Duration;

// =============================================================================
// QUEUE SIZING
// =============================================================================

/// Default maximum queue depth for a channel
/// Matches the depth hardware event channels are created with
pub const DEFAULT_CHANNEL_DEPTH: usize = 128;

/// Upper bound on slots reserved up front when a channel is created
/// Deeper channels grow their buffer on demand
pub const MAX_PREALLOCATED_SLOTS: usize = 4096;

// =============================================================================
// TIMEOUTS
// =============================================================================

/// Standard write/read timeout for blocking channel operations (10s)
pub const STANDARD_CHANNEL_TIMEOUT: Duration = Duration::from_secs(10);

/// Short timeout for latency-sensitive producers (100ms)
pub const LOW_LATENCY_CHANNEL_TIMEOUT: Duration = Duration::from_millis(100);

/// Timeout the writer registry uses when publishing an event (1s)
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(1);
