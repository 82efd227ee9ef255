// src/common/error.rs

use core::fmt;

#[derive(Debug, thiserror::Error)]
pub enum Dht12Error<E = ()>
where
    E: core::fmt::Debug, // Still need Debug for the generic Io error
{
    /// Underlying I/O error from the pin or bus implementation.
    #[error("I/O error: {0:?}")] // Format string requires Debug on E
    Io(E),

    /// A data pulse never ended within the cycle budget.
    #[error("Timed out waiting for a data pulse")]
    Timeout,

    /// The sensor never answered the start condition with its low pulse.
    #[error("Timed out waiting for the start signal low pulse")]
    TimeoutLow,

    /// The sensor pulled the line low but never released it high.
    #[error("Timed out waiting for the start signal high pulse")]
    TimeoutHigh,

    /// Received checksum does not match the sum of the data bytes.
    #[error("Checksum mismatch: expected {expected:#04x}, calculated {calculated:#04x}")]
    Checksum { expected: u8, calculated: u8 },

    /// The bus transaction could not be opened (address not acknowledged).
    #[error("Bus connection error")]
    Connect,

    /// Acknowledge low phase missing.
    #[error("Acknowledge low error")]
    AckLow,

    /// Acknowledge high phase missing.
    #[error("Acknowledge high error")]
    AckHigh,

    /// Provided value is not a 7-bit bus address.
    #[error("Invalid bus address: {0:#04x}")]
    InvalidAddress(u8),

    /// Clock or timeout settings produce no usable cycle budget.
    #[error("Invalid configuration")]
    InvalidConfig,
}

// Allow mapping from underlying HAL error if From is implemented
impl<E: core::fmt::Debug> From<E> for Dht12Error<E> {
    fn from(e: E) -> Self {
        Dht12Error::Io(e)
    }
}

/// Outcome of a single acquisition attempt.
///
/// Every call to [`crate::Dht12::acquire`] yields exactly one of these. `None` is only
/// reported before the first non-throttled attempt.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadStatus {
    Ok,
    ErrorChecksum,
    ErrorTimeout,
    ErrorTimeoutLow,
    ErrorTimeoutHigh,
    ErrorConnect,
    ErrorAckLow,
    ErrorAckHigh,
    ErrorUnknown,
    None,
}

impl ReadStatus {
    #[inline]
    pub const fn is_ok(&self) -> bool {
        matches!(self, ReadStatus::Ok)
    }

    /// Folds an acquisition result into its status code.
    pub fn from_result<T, E: fmt::Debug>(result: &Result<T, Dht12Error<E>>) -> Self {
        match result {
            Ok(_) => ReadStatus::Ok,
            Err(e) => ReadStatus::from(e),
        }
    }
}

impl<E: fmt::Debug> From<&Dht12Error<E>> for ReadStatus {
    fn from(e: &Dht12Error<E>) -> Self {
        match e {
            Dht12Error::Checksum { .. } => ReadStatus::ErrorChecksum,
            Dht12Error::Timeout => ReadStatus::ErrorTimeout,
            Dht12Error::TimeoutLow => ReadStatus::ErrorTimeoutLow,
            Dht12Error::TimeoutHigh => ReadStatus::ErrorTimeoutHigh,
            Dht12Error::Connect => ReadStatus::ErrorConnect,
            Dht12Error::AckLow => ReadStatus::ErrorAckLow,
            Dht12Error::AckHigh => ReadStatus::ErrorAckHigh,
            Dht12Error::Io(_) | Dht12Error::InvalidAddress(_) | Dht12Error::InvalidConfig => {
                ReadStatus::ErrorUnknown
            }
        }
    }
}

impl fmt::Display for ReadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ReadStatus::*;
        match self {
            Ok => write!(f, "OK"),
            ErrorChecksum => write!(f, "Checksum error"),
            ErrorTimeout => write!(f, "Timeout error"),
            ErrorTimeoutLow => write!(f, "Timeout error low"),
            ErrorTimeoutHigh => write!(f, "Timeout error high"),
            ErrorConnect => write!(f, "Connect error"),
            ErrorAckLow => write!(f, "AckL error"),
            ErrorAckHigh => write!(f, "AckH error"),
            ErrorUnknown => write!(f, "Unknown error"),
            None => write!(f, "No result"),
        }
    }
}
