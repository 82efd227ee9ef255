// src/driver/pulse.rs

use crate::common::{
    config::SingleWireConfig,
    hal_traits::{Level, SignalPin},
};

/// Measures how long the data line stays at a level, in polling iterations.
///
/// Counts are only meaningful relative to each other (a `1` bit is a high phase
/// longer than the low phase before it), so no conversion to microseconds happens.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PulseTimer {
    max_cycles: u32,
}

impl PulseTimer {
    /// A zero budget is bumped to one poll.
    pub const fn new(max_cycles: u32) -> Self {
        Self { max_cycles: if max_cycles == 0 { 1 } else { max_cycles } }
    }

    pub fn from_config(config: &SingleWireConfig) -> Self {
        Self::new(config.max_cycles())
    }

    #[inline]
    pub const fn max_cycles(&self) -> u32 {
        self.max_cycles
    }

    /// Polls `pin` while it reads `level` and returns the number of polls.
    ///
    /// Returns `Ok(0)` when the budget runs out before the level changes, and also
    /// when the line is not at `level` on the first poll. Zero always means "no pulse".
    #[inline]
    pub fn measure<P: SignalPin>(&self, pin: &mut P, level: Level) -> Result<u32, P::Error> {
        let mut count: u32 = 0;
        while pin.read()? == level {
            count += 1;
            if count >= self.max_cycles {
                return Ok(0);
            }
        }
        Ok(count)
    }
}

impl From<&SingleWireConfig> for PulseTimer {
    fn from(config: &SingleWireConfig) -> Self {
        Self::from_config(config)
    }
}
