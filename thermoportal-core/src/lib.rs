//! Board-agnostic core logic for the Thermoportal display
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (temperature sensor, network link, weather
//!   source, clock)
//! - Fixed-point temperature conversion
//! - Refresh-interval gating for the clock sync and weather fetch
//! - Weather API query building and response parsing
//! - SNTP packet handling and wall clock tracking
//! - The dashboard loop body that ties them to the screen

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod clock;
pub mod config;
pub mod dashboard;
pub mod refresh;
pub mod traits;
pub mod units;
pub mod weather;

pub use dashboard::{Dashboard, StepError, StepReport};
pub use refresh::RefreshTimer;
