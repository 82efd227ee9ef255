// src/common/address.rs

use super::error::Dht12Error;
use core::convert::TryFrom;
use core::fmt;

/// 7-bit bus address of a sensor running in register mode.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dht12Addr(u8);

impl Dht12Addr {
    pub const DEFAULT_ADDRESS: Dht12Addr = Dht12Addr(0x5C);

    /// Creates a new `Dht12Addr` if the value fits in 7 bits.
    /// Returns `Result<Self, Dht12Error<()>>` because validation itself
    /// cannot cause an I/O error.
    pub fn new(address: u8) -> Result<Self, Dht12Error<()>> {
        if Self::is_valid_address(address) {
            Ok(Dht12Addr(address))
        } else {
            Err(Dht12Error::InvalidAddress(address))
        }
    }

    #[inline]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_valid_address(address: u8) -> bool {
        address <= 0x7F
    }
}

impl Default for Dht12Addr {
    fn default() -> Self {
        Self::DEFAULT_ADDRESS
    }
}

impl TryFrom<u8> for Dht12Addr {
    type Error = Dht12Error<()>;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Dht12Addr> for u8 {
    fn from(value: Dht12Addr) -> Self {
        value.0
    }
}

impl fmt::Display for Dht12Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}
