// src/adapters.rs

//! Glue from `embedded-hal` 1.0 peripherals to this crate's HAL traits.

use crate::common::{
    address::Dht12Addr,
    frame::FRAME_LEN,
    hal_traits::{Dht12Bus, Dht12Timer, Level, PinMode, SignalPin},
};
use arrayvec::ArrayVec;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    i2c::I2c,
};

/// An open-drain pin with a pull-up, as used by most DHT wiring.
///
/// Releasing the line and driving it high are the same operation on an open-drain
/// output, so `set_mode(InputPullup)` just writes high and `Output` is a no-op.
pub struct HalPin<P> {
    pin: P,
}

impl<P: InputPin + OutputPin> HalPin<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin + OutputPin> SignalPin for HalPin<P> {
    type Error = P::Error;

    fn set_mode(&mut self, mode: PinMode) -> Result<(), Self::Error> {
        match mode {
            PinMode::InputPullup => self.pin.set_high(),
            PinMode::Output => Ok(()),
        }
    }

    fn write(&mut self, level: Level) -> Result<(), Self::Error> {
        match level {
            Level::Low => self.pin.set_low(),
            Level::High => self.pin.set_high(),
        }
    }

    #[inline]
    fn read(&mut self) -> Result<Level, Self::Error> {
        self.pin.is_high().map(Level::from)
    }
}

/// A `DelayNs` plus a millisecond clock.
///
/// `embedded-hal` has no clock trait, so the clock is any closure returning
/// wrapping milliseconds (an RTC counter, a SysTick tally, `Instant` on a host).
pub struct HalTimer<D, C> {
    delay: D,
    clock: C,
}

impl<D, C> HalTimer<D, C>
where
    D: DelayNs,
    C: Fn() -> u32,
{
    pub fn new(delay: D, clock: C) -> Self {
        Self { delay, clock }
    }

    pub fn release(self) -> (D, C) {
        (self.delay, self.clock)
    }
}

impl<D, C> Dht12Timer for HalTimer<D, C>
where
    D: DelayNs,
    C: Fn() -> u32,
{
    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    fn now_ms(&self) -> u32 {
        (self.clock)()
    }
}

/// Largest transfer either direction; the sensor never needs more than a frame.
const BUFFER_LEN: usize = FRAME_LEN + 3;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalI2cError<E> {
    Bus(E),
    /// More bytes queued or requested than the adapter buffers.
    BufferFull,
}

/// Wire-style buffered transactions on top of a blocking `I2c`.
pub struct HalI2c<I> {
    i2c: I,
    target: Dht12Addr,
    tx: ArrayVec<u8, BUFFER_LEN>,
    rx: ArrayVec<u8, BUFFER_LEN>,
    rx_pos: usize,
}

impl<I: I2c> HalI2c<I> {
    pub fn new(i2c: I) -> Self {
        Self {
            i2c,
            target: Dht12Addr::default(),
            tx: ArrayVec::new(),
            rx: ArrayVec::new(),
            rx_pos: 0,
        }
    }

    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> Dht12Bus for HalI2c<I> {
    type Error = HalI2cError<I::Error>;

    fn begin_transaction(&mut self, address: Dht12Addr) {
        self.target = address;
        self.tx.clear();
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.tx.try_push(byte).map_err(|_| HalI2cError::BufferFull)
    }

    fn end_transaction(&mut self) -> Result<(), Self::Error> {
        let result = self.i2c.write(self.target.as_u8(), &self.tx);
        self.tx.clear();
        result.map_err(HalI2cError::Bus)
    }

    fn request_bytes(&mut self, address: Dht12Addr, count: usize) -> Result<usize, Self::Error> {
        if count > BUFFER_LEN {
            return Err(HalI2cError::BufferFull);
        }
        self.rx.clear();
        self.rx_pos = 0;
        let mut buf = [0u8; BUFFER_LEN];
        self.i2c.read(address.as_u8(), &mut buf[..count]).map_err(HalI2cError::Bus)?;
        // capacity checked above
        let _ = self.rx.try_extend_from_slice(&buf[..count]);
        Ok(count)
    }

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        let byte = *self.rx.get(self.rx_pos).ok_or(nb::Error::WouldBlock)?;
        self.rx_pos += 1;
        Ok(byte)
    }

    fn bytes_remaining(&self) -> usize {
        self.rx.len() - self.rx_pos
    }
}
