//! Hardware abstraction traits
//!
//! These traits define the interface between the dashboard logic
//! and hardware or network specific implementations.

pub mod network;
pub mod sensor;

pub use network::{
    ClockError, LinkError, NetworkLink, TimeSource, WeatherError, WeatherSource,
};
pub use sensor::{SensorError, TemperatureSensor};
