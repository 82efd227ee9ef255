// src/driver/single_wire.rs

use super::{
    interrupt::InterruptGuard, pulse::PulseTimer, sealed, AcquisitionMode, FrameSource,
};
use crate::common::{
    config::SingleWireConfig,
    error::Dht12Error,
    frame::{RawFrame, FRAME_LEN},
    hal_traits::{Dht12Timer, InterruptLock, Level, PinMode, SignalPin},
    timing,
};
use arrayvec::ArrayVec;

/// Bits per frame.
pub const FRAME_BITS: usize = FRAME_LEN * 8;

/// Measured widths of one data bit, in polling iterations.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulsePair {
    pub low: u32,
    pub high: u32,
}

impl PulsePair {
    /// A bit is `1` when its high phase outlasts the low phase before it. Ties are `0`.
    #[inline]
    pub fn bit(&self) -> bool {
        self.high > self.low
    }
}

/// Packs bit decisions MSB-first. Missing trailing pairs read as zero bits.
pub fn decode_pulses(pulses: &[PulsePair]) -> RawFrame {
    let mut bytes = [0u8; FRAME_LEN];
    for (i, pair) in pulses.iter().take(FRAME_BITS).enumerate() {
        bytes[i / 8] <<= 1;
        if pair.bit() {
            bytes[i / 8] |= 1;
        }
    }
    RawFrame::from_bytes(bytes)
}

/// Bit-banged acquisition over a single open-drain data line.
///
/// Sequence per read:
/// 1. release the line to the pull-up and let it settle,
/// 2. hold it low as the start condition,
/// 3. with interrupts masked, release it and time the sensor's low/high handshake,
/// 4. still masked, time 40 (low, high) pulse pairs,
/// 5. decide bits from the pairs and verify the checksum.
pub struct SingleWire<P, L> {
    pin: P,
    lock: L,
    pulse: PulseTimer,
}

impl<P, L> SingleWire<P, L>
where
    P: SignalPin,
    L: InterruptLock,
{
    pub fn new(pin: P, lock: L, config: SingleWireConfig) -> Self {
        Self { pin, lock, pulse: PulseTimer::from_config(&config) }
    }

    /// Gives back the pin and the interrupt lock.
    pub fn release(self) -> (P, L) {
        (self.pin, self.lock)
    }

    #[inline]
    pub fn pulse_timer(&self) -> PulseTimer {
        self.pulse
    }

    /// Steps 1 and 2. Millisecond tolerances, interrupts stay enabled.
    fn send_start<T: Dht12Timer>(&mut self, timer: &mut T) -> Result<(), Dht12Error<P::Error>> {
        self.pin.set_mode(PinMode::InputPullup)?;
        timer.delay_ms(timing::as_ms(timing::RELEASE_SETTLE));

        self.pin.set_mode(PinMode::Output)?;
        self.pin.write(Level::Low)?;
        timer.delay_ms(timing::as_ms(timing::START_SIGNAL_LOW));
        Ok(())
    }

    /// Steps 3 and 4. Runs entirely under the interrupt guard.
    fn capture<T: Dht12Timer>(
        &mut self,
        timer: &mut T,
    ) -> Result<ArrayVec<PulsePair, FRAME_BITS>, Dht12Error<P::Error>> {
        let _guard = InterruptGuard::new(&mut self.lock);

        self.pin.write(Level::High)?;
        timer.delay_us(timing::as_us(timing::START_SIGNAL_HIGH));
        self.pin.set_mode(PinMode::InputPullup)?;
        timer.delay_us(timing::as_us(timing::RESPONSE_WAIT));

        if self.pulse.measure(&mut self.pin, Level::Low)? == 0 {
            warn!("Timeout waiting for start signal low pulse");
            return Err(Dht12Error::TimeoutLow);
        }
        if self.pulse.measure(&mut self.pin, Level::High)? == 0 {
            warn!("Timeout waiting for start signal high pulse");
            return Err(Dht12Error::TimeoutHigh);
        }

        let mut pulses = ArrayVec::<PulsePair, FRAME_BITS>::new();
        for bit in 0..FRAME_BITS {
            let low = self.pulse.measure(&mut self.pin, Level::Low)?;
            if low == 0 {
                warn!("Timeout waiting for low phase of bit {}", bit);
                return Err(Dht12Error::Timeout);
            }
            let high = self.pulse.measure(&mut self.pin, Level::High)?;
            if high == 0 {
                warn!("Timeout waiting for high phase of bit {}", bit);
                return Err(Dht12Error::Timeout);
            }
            pulses.push(PulsePair { low, high });
        }
        Ok(pulses)
    }
}

impl<P: SignalPin, L: InterruptLock> sealed::Sealed for SingleWire<P, L> {}

impl<P, L> FrameSource for SingleWire<P, L>
where
    P: SignalPin,
    L: InterruptLock,
{
    type Error = P::Error;

    fn mode(&self) -> AcquisitionMode {
        AcquisitionMode::SingleWire
    }

    fn prepare(&mut self) -> Result<(), Dht12Error<Self::Error>> {
        debug!("Single-wire mode, max cycles {}", self.pulse.max_cycles());
        self.pin.set_mode(PinMode::InputPullup)?;
        Ok(())
    }

    fn read_frame<T: Dht12Timer>(&mut self, timer: &mut T) -> Result<RawFrame, Dht12Error<Self::Error>> {
        self.send_start(timer)?;
        let pulses = self.capture(timer)?;

        let frame = decode_pulses(&pulses);
        trace!("Received {}, checksum should be {}", frame, frame.calculated_checksum());
        frame.verify()
    }
}
