// src/common/timing.rs

use core::time::Duration;

// Nominal values from the DHT12 / AM2302 single-bus timing diagrams.
// The sensor tolerates generous slack on the host-driven phases; only the
// pulse widths it sends back are timing critical.

// === Throttle ===

/// Minimum time between two acquisitions. Polling faster returns garbage.
pub const MIN_READ_INTERVAL: Duration = Duration::from_millis(2000);

// === Start Condition (host driven, interrupts enabled) ===

/// Line released to the pull-up before the start signal.
pub const RELEASE_SETTLE: Duration = Duration::from_millis(250);
/// Host holds the line low to request a reading.
pub const START_SIGNAL_LOW: Duration = Duration::from_millis(20);

// === Handshake (interrupts masked) ===

/// Host drives the line high to end the start signal.
pub const START_SIGNAL_HIGH: Duration = Duration::from_micros(40);
/// Time for the sensor to pull the released line low.
pub const RESPONSE_WAIT: Duration = Duration::from_micros(10);
/// Nominal width of each handshake pulse (low then high).
pub const HANDSHAKE_PULSE: Duration = Duration::from_micros(80);

// === Data Bits ===

/// Nominal low phase preceding every data bit.
pub const BIT_LOW_PHASE: Duration = Duration::from_micros(50);
/// Nominal high phase of a `0` bit.
pub const BIT_ZERO_HIGH: Duration = Duration::from_micros(28);
/// Nominal high phase of a `1` bit.
pub const BIT_ONE_HIGH: Duration = Duration::from_micros(70);
/// Any single pulse longer than this is a timeout.
pub const PULSE_TIMEOUT: Duration = Duration::from_millis(1);

// === Bus Mode ===

/// Pause after draining the frame before checking for trailing bytes.
pub const BUS_SETTLE: Duration = Duration::from_millis(1);

/// Whole milliseconds of `d`, saturating.
#[inline]
pub(crate) fn as_ms(d: Duration) -> u32 {
    u32::try_from(d.as_millis()).unwrap_or(u32::MAX)
}

/// Whole microseconds of `d`, saturating.
#[inline]
pub(crate) fn as_us(d: Duration) -> u32 {
    u32::try_from(d.as_micros()).unwrap_or(u32::MAX)
}
