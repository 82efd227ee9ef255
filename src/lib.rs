// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)] // Specify no_std at the crate root

// Logging macros must be declared before the modules that use them
#[macro_use]
mod fmt;

pub mod common;
pub mod driver;

#[cfg(feature = "impl-generic-hal")]
pub mod adapters;

// Re-export key types for convenience
pub use common::{Dht12Addr, Dht12Error, RawFrame, ReadStatus, RetryPolicy, SingleWireConfig};
pub use driver::{AcquisitionMode, Dht12, Reading};
