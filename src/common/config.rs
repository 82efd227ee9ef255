// src/common/config.rs

use super::{error::Dht12Error, timing};
use core::time::Duration;

/// Settings for the bit-banged path.
///
/// The pulse timer counts polling iterations, not microseconds, so its bound is
/// expressed in CPU cycles: `clock_hz / 1_000_000 * pulse_timeout_us`. One poll
/// costs several cycles, which makes the effective timeout generous rather than tight.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SingleWireConfig {
    clock_hz: u32,
    pulse_timeout_us: u32,
}

impl SingleWireConfig {
    pub const DEFAULT_CLOCK_HZ: u32 = 240_000_000;

    /// Checks that `clock_hz` is at least 1 MHz and `pulse_timeout` is non-zero.
    pub fn new(clock_hz: u32, pulse_timeout: Duration) -> Result<Self, Dht12Error<()>> {
        let pulse_timeout_us = timing::as_us(pulse_timeout);
        if clock_hz < 1_000_000 || pulse_timeout_us == 0 {
            return Err(Dht12Error::InvalidConfig);
        }
        Ok(Self { clock_hz, pulse_timeout_us })
    }

    /// Default pulse timeout at the given clock.
    pub fn with_clock(clock_hz: u32) -> Result<Self, Dht12Error<()>> {
        Self::new(clock_hz, timing::PULSE_TIMEOUT)
    }

    #[inline]
    pub const fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    #[inline]
    pub fn pulse_timeout(&self) -> Duration {
        Duration::from_micros(self.pulse_timeout_us as u64)
    }

    /// Polling budget for one pulse.
    pub fn max_cycles(&self) -> u32 {
        (self.clock_hz / 1_000_000).saturating_mul(self.pulse_timeout_us).max(1)
    }
}

impl Default for SingleWireConfig {
    fn default() -> Self {
        Self {
            clock_hz: Self::DEFAULT_CLOCK_HZ,
            pulse_timeout_us: timing::as_us(timing::PULSE_TIMEOUT),
        }
    }
}

/// Caller-side policy for [`crate::Dht12::read_with_retries`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Attempts including the first one. Zero is treated as one.
    pub max_attempts: u8,
    /// Pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    /// Ten attempts, each one after the throttle has expired.
    fn default() -> Self {
        Self { max_attempts: 10, delay: timing::MIN_READ_INTERVAL }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget_is_one_ms_of_cycles() {
        let config = SingleWireConfig::default();
        assert_eq!(config.clock_hz(), 240_000_000);
        assert_eq!(config.pulse_timeout(), Duration::from_millis(1));
        assert_eq!(config.max_cycles(), 240_000);
    }

    #[test]
    fn test_budget_scales_with_clock() {
        assert_eq!(SingleWireConfig::with_clock(16_000_000).unwrap().max_cycles(), 16_000);
        assert_eq!(
            SingleWireConfig::new(80_000_000, Duration::from_micros(500)).unwrap().max_cycles(),
            40_000
        );
    }

    #[test]
    fn test_budget_saturates() {
        let config = SingleWireConfig::new(u32::MAX, Duration::from_secs(10)).unwrap();
        assert_eq!(config.max_cycles(), u32::MAX);
    }

    #[test]
    fn test_rejects_unusable_settings() {
        assert!(matches!(SingleWireConfig::with_clock(999_999), Err(Dht12Error::InvalidConfig)));
        assert!(matches!(
            SingleWireConfig::new(16_000_000, Duration::from_nanos(500)),
            Err(Dht12Error::InvalidConfig)
        ));
    }

    #[test]
    fn test_default_retry_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.delay, timing::MIN_READ_INTERVAL);
    }
}
