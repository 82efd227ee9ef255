// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod config;
pub mod convert;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod timing;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::Dht12Addr;

// From config.rs
pub use config::{RetryPolicy, SingleWireConfig};

// From convert.rs
pub use convert::{celsius_to_fahrenheit, dew_point, fahrenheit_to_celsius, heat_index};

// From error.rs
pub use error::{Dht12Error, ReadStatus};

// From frame.rs
pub use frame::{RawFrame, FRAME_LEN};

// From hal_traits.rs
pub use hal_traits::{Dht12Bus, Dht12Timer, InterruptLock, Level, PinMode, SignalPin};
