// src/driver/mod.rs

// Acquisition primitives
pub mod pulse;
pub mod interrupt;

// The two acquisition paths
pub mod single_wire;
pub mod bus;

// The throttled sensor handle and its read surface
pub mod sensor;

#[cfg(test)]
pub(crate) mod mocks;

use crate::common::{
    address::Dht12Addr, error::Dht12Error, frame::RawFrame, hal_traits::Dht12Timer,
};
use core::fmt::Debug;

// --- Public Re-exports ---
pub use bus::BusReader;
pub use interrupt::{InterruptGuard, NoopInterruptLock};
#[cfg(feature = "critical-section")]
pub use interrupt::CriticalSectionLock;
pub use pulse::PulseTimer;
pub use sensor::{Dht12, Reading};
pub use single_wire::{decode_pulses, PulsePair, SingleWire};

/// Which wire protocol a handle talks. Fixed when the handle is built.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquisitionMode {
    /// Bit-banged pulse timing on a dedicated data pin.
    SingleWire,
    /// Register read over an addressed bus.
    Bus { address: Dht12Addr },
}

mod sealed {
    pub trait Sealed {}
}

/// A way of pulling one [`RawFrame`] out of the sensor.
///
/// Sealed: [`SingleWire`] and [`BusReader`] are the only implementations.
pub trait FrameSource: sealed::Sealed {
    /// HAL error of the underlying pin or bus.
    type Error: Debug;

    /// Reports the acquisition mode this source implements.
    fn mode(&self) -> AcquisitionMode;

    /// Puts the line or bus into its idle state.
    fn prepare(&mut self) -> Result<(), Dht12Error<Self::Error>>;

    /// Runs one complete, checksum-verified acquisition. Never retries.
    fn read_frame<T: Dht12Timer>(&mut self, timer: &mut T) -> Result<RawFrame, Dht12Error<Self::Error>>;
}
