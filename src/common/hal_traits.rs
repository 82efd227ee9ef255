// src/common/hal_traits.rs

use super::address::Dht12Addr;
use core::fmt::Debug;

/// Logic level on the data line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Direction of the single-wire data pin.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Released, the pull-up holds the line high unless the sensor drives it.
    InputPullup,
    /// Actively driven by the host.
    Output,
}

/// Abstraction for timer/delay operations and the millisecond clock.
///
/// Note: the delays could be served by `embedded_hal::delay::DelayNs`; the clock
/// has no embedded-hal counterpart, see `adapters::HalTimer` for the glue.
pub trait Dht12Timer {
    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Monotonic milliseconds since some fixed point. Allowed to wrap.
    fn now_ms(&self) -> u32;
}

/// Abstraction for the bidirectional data pin used by the bit-banged protocol.
pub trait SignalPin {
    /// Associated error type for pin errors.
    type Error: Debug;

    /// Switches between driving the line and releasing it to the pull-up.
    fn set_mode(&mut self, mode: PinMode) -> Result<(), Self::Error>;

    /// Drives the line to `level`. Only meaningful in `PinMode::Output`,
    /// except `High` which must also be accepted while released.
    fn write(&mut self, level: Level) -> Result<(), Self::Error>;

    /// Samples the current level of the line.
    ///
    /// This sits in the innermost polling loop; implementations should be a
    /// single register read.
    fn read(&mut self) -> Result<Level, Self::Error>;
}

/// Abstraction for a buffered, addressed bus transaction (Wire-style I2C).
///
/// Writes are queued between `begin_transaction` and `end_transaction`; reads are
/// fetched in one go by `request_bytes` and then drained byte by byte.
pub trait Dht12Bus {
    /// Associated error type for bus errors.
    type Error: Debug;

    /// Starts queueing a write to `address`.
    fn begin_transaction(&mut self, address: Dht12Addr);

    /// Queues one byte for the current transaction.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Sends the queued bytes. An error means the device did not acknowledge.
    fn end_transaction(&mut self) -> Result<(), Self::Error>;

    /// Reads up to `count` bytes from `address` into the receive buffer.
    /// Returns how many bytes were received.
    fn request_bytes(&mut self, address: Dht12Addr, count: usize) -> Result<usize, Self::Error>;

    /// Takes the next received byte.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if the receive buffer is empty.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Number of received bytes not consumed yet.
    fn bytes_remaining(&self) -> usize;
}

/// Masks and unmasks interrupts around the timing critical section.
///
/// Callers never use this directly; see [`crate::driver::InterruptGuard`].
pub trait InterruptLock {
    /// Disables maskable interrupts, remembering the previous state.
    fn disable(&mut self);

    /// Restores the state saved by the matching `disable`.
    fn restore(&mut self);
}
