// src/driver/sensor.rs

use super::{bus::BusReader, single_wire::SingleWire, AcquisitionMode, FrameSource};
use crate::common::{
    address::Dht12Addr,
    config::{RetryPolicy, SingleWireConfig},
    convert,
    error::{Dht12Error, ReadStatus},
    frame::RawFrame,
    hal_traits::{Dht12Bus, Dht12Timer, InterruptLock, SignalPin},
    timing,
};

/// One decoded measurement.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Relative humidity in percent.
    pub humidity: f32,
    /// Temperature in degrees Celsius.
    pub temperature: f32,
}

impl Reading {
    pub fn from_frame(frame: &RawFrame) -> Self {
        Self { humidity: frame.humidity(), temperature: frame.temperature() }
    }

    pub fn temperature_fahrenheit(&self) -> f32 {
        convert::celsius_to_fahrenheit(self.temperature)
    }

    /// Apparent temperature, in Fahrenheit when `fahrenheit` is set, Celsius otherwise.
    pub fn heat_index(&self, fahrenheit: bool) -> f32 {
        let temperature = if fahrenheit { self.temperature_fahrenheit() } else { self.temperature };
        convert::heat_index(temperature, self.humidity, fahrenheit)
    }

    /// Dew point, in Fahrenheit when `fahrenheit` is set, Celsius otherwise.
    pub fn dew_point(&self, fahrenheit: bool) -> f32 {
        let temperature = if fahrenheit { self.temperature_fahrenheit() } else { self.temperature };
        convert::dew_point(temperature, self.humidity, fahrenheit)
    }
}

impl From<RawFrame> for Reading {
    fn from(frame: RawFrame) -> Self {
        Self::from_frame(&frame)
    }
}

/// Outcome of the most recent acquisition attempt.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct ReadState {
    /// `None` until the first attempt, so that one is never throttled.
    last_attempt_ms: Option<u32>,
    /// Only ever holds a checksum-verified frame.
    frame: Option<RawFrame>,
    status: ReadStatus,
}

impl Default for ReadState {
    fn default() -> Self {
        Self { last_attempt_ms: None, frame: None, status: ReadStatus::None }
    }
}

/// A DHT12 handle.
///
/// Owns one [`FrameSource`] (fixed for the handle's lifetime), the timer and the
/// cached result of the last acquisition. Acquisitions closer together than
/// [`timing::MIN_READ_INTERVAL`] are answered from the cache unless forced.
///
/// Not `Sync`; share it behind one exclusive lock if several contexts need it.
pub struct Dht12<S, T> {
    source: S,
    timer: T,
    state: ReadState,
}

impl<P, L, T> Dht12<SingleWire<P, L>, T>
where
    P: SignalPin,
    L: InterruptLock,
    T: Dht12Timer,
{
    /// Handle talking the bit-banged protocol on `pin`.
    pub fn new_single_wire(pin: P, lock: L, timer: T, config: SingleWireConfig) -> Self {
        Self::new(SingleWire::new(pin, lock, config), timer)
    }
}

impl<B, T> Dht12<BusReader<B>, T>
where
    B: Dht12Bus,
    T: Dht12Timer,
{
    /// Handle reading the sensor's registers over `bus`.
    pub fn new_bus(bus: B, address: Dht12Addr, timer: T) -> Self {
        Self::new(BusReader::new(bus, address), timer)
    }
}

impl<S, T> Dht12<S, T>
where
    S: FrameSource,
    T: Dht12Timer,
{
    pub fn new(source: S, timer: T) -> Self {
        Self { source, timer, state: ReadState::default() }
    }

    /// Forgets any previous result and puts the line or bus into its idle state.
    /// The next acquisition is never throttled.
    pub fn begin(&mut self) -> Result<(), Dht12Error<S::Error>> {
        self.state = ReadState::default();
        self.source.prepare()
    }

    /// Runs one acquisition unless the last attempt is too recent.
    ///
    /// A throttled call returns the cached status without touching the hardware.
    /// Otherwise the attempt time is recorded before dispatching, so a failing
    /// sensor is still polled at most once per interval.
    pub fn acquire(&mut self, force: bool) -> ReadStatus {
        let now = self.timer.now_ms();
        if !force {
            if let Some(last) = self.state.last_attempt_ms {
                // wrapping subtraction keeps this correct across clock rollover
                let elapsed = now.wrapping_sub(last);
                if elapsed < timing::as_ms(timing::MIN_READ_INTERVAL) {
                    trace!("Throttled, {} ms since last attempt", elapsed);
                    return self.state.status;
                }
            }
        }
        self.state.last_attempt_ms = Some(now);
        trace!("Acquiring at {} ms, mode {}", now, self.source.mode());

        let result = self.source.read_frame(&mut self.timer);
        let status = ReadStatus::from_result(&result);
        match result {
            Ok(frame) => {
                debug!("Acquired {}", frame);
                self.state.frame = Some(frame);
            }
            Err(_) => {
                warn!("Acquisition failed: {}", status);
                self.state.frame = None;
            }
        }
        self.state.status = status;
        status
    }

    /// Acquires (subject to the throttle) and decodes the cached frame.
    pub fn read(&mut self, force: bool) -> Result<Reading, ReadStatus> {
        let status = self.acquire(force);
        match self.state.frame {
            Some(frame) if status.is_ok() => Ok(Reading::from_frame(&frame)),
            _ => Err(status),
        }
    }

    /// Temperature in Fahrenheit or Celsius, NaN if the acquisition failed.
    pub fn temperature(&mut self, fahrenheit: bool, force: bool) -> f32 {
        match self.read(force) {
            Ok(reading) if fahrenheit => reading.temperature_fahrenheit(),
            Ok(reading) => reading.temperature,
            Err(_) => f32::NAN,
        }
    }

    /// Relative humidity in percent, NaN if the acquisition failed.
    pub fn humidity(&mut self, force: bool) -> f32 {
        self.read(force).map_or(f32::NAN, |reading| reading.humidity)
    }

    /// See [`convert::heat_index`].
    pub fn heat_index(&self, temperature: f32, percent_humidity: f32, is_fahrenheit: bool) -> f32 {
        convert::heat_index(temperature, percent_humidity, is_fahrenheit)
    }

    /// See [`convert::dew_point`].
    pub fn dew_point(&self, temperature: f32, percent_humidity: f32, is_fahrenheit: bool) -> f32 {
        convert::dew_point(temperature, percent_humidity, is_fahrenheit)
    }

    /// Reads until one attempt succeeds or the policy runs out, waiting
    /// `policy.delay` between attempts. Returns the last failure status.
    pub fn read_with_retries(&mut self, policy: RetryPolicy) -> Result<Reading, ReadStatus> {
        let attempts = policy.max_attempts.max(1);
        let mut status = ReadStatus::None;
        for attempt in 0..attempts {
            if attempt > 0 {
                self.timer.delay_ms(timing::as_ms(policy.delay));
            }
            match self.read(false) {
                Ok(reading) => return Ok(reading),
                Err(failed) => {
                    debug!("Attempt {} of {} failed: {}", attempt + 1, attempts, failed);
                    status = failed;
                }
            }
        }
        Err(status)
    }

    /// Status of the last acquisition attempt, `ReadStatus::None` before the first.
    #[inline]
    pub fn status(&self) -> ReadStatus {
        self.state.status
    }

    /// The last verified frame, `None` if the last attempt failed.
    #[inline]
    pub fn frame(&self) -> Option<RawFrame> {
        self.state.frame
    }

    #[inline]
    pub fn mode(&self) -> AcquisitionMode {
        self.source.mode()
    }

    /// Gives back the acquisition source and the timer.
    pub fn release(self) -> (S, T) {
        (self.source, self.timer)
    }
}
