// src/common/frame.rs

use super::error::Dht12Error;

/// Number of bytes the sensor sends per reading.
pub const FRAME_LEN: usize = 5;

/// The five bytes exchanged with the sensor:
/// humidity integral, humidity fraction, temperature integral,
/// temperature fraction (bit 7 = sign), checksum.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawFrame([u8; FRAME_LEN]);

impl RawFrame {
    const SIGN_BIT: u8 = 0x80;

    /// Wraps the received bytes without checking them.
    pub const fn from_bytes(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds a frame from the four data bytes, appending the matching checksum.
    pub fn with_checksum(data: [u8; 4]) -> Self {
        Self([data[0], data[1], data[2], data[3], checksum(&data)])
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// The checksum byte as sent by the sensor.
    #[inline]
    pub const fn checksum(&self) -> u8 {
        self.0[4]
    }

    /// Low byte of the sum of the four data bytes.
    #[inline]
    pub fn calculated_checksum(&self) -> u8 {
        checksum(&[self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Checks the checksum byte against the data bytes.
    pub fn verify<E: core::fmt::Debug>(self) -> Result<Self, Dht12Error<E>> {
        let calculated = self.calculated_checksum();
        if calculated == self.checksum() {
            Ok(self)
        } else {
            warn!("Checksum mismatch: expected {}, calculated {}", self.checksum(), calculated);
            Err(Dht12Error::Checksum { expected: self.checksum(), calculated })
        }
    }

    /// Relative humidity in percent.
    pub fn humidity(&self) -> f32 {
        self.0[0] as f32 + self.0[1] as f32 / 10.0
    }

    /// Temperature in degrees Celsius.
    pub fn temperature(&self) -> f32 {
        decode_signed(self.0[2], self.0[3])
    }
}

/// Sum of the data bytes modulo 256.
#[inline]
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}

/// Sign/magnitude decode: `integral + (fraction & 0x7F) / 10`, negated when bit 7 of `fraction` is set.
pub fn decode_signed(integral: u8, fraction: u8) -> f32 {
    let magnitude = integral as f32 + (fraction & !RawFrame::SIGN_BIT) as f32 / 10.0;
    if fraction & RawFrame::SIGN_BIT != 0 {
        -magnitude
    } else {
        magnitude
    }
}

impl From<RawFrame> for [u8; FRAME_LEN] {
    fn from(frame: RawFrame) -> Self {
        frame.0
    }
}
