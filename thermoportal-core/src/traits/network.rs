//! Network link and network-backed data sources
//!
//! All of these are async because they block on Wi-Fi round trips.
//! The dashboard awaits them inline, one after the other, and brings the
//! link back up before any network job that is due.

use crate::weather::CurrentConditions;

/// Errors from the weather source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WeatherError {
    /// Connection, DNS, TLS or read failure
    Transport,
    /// Server answered with a non-success status
    HttpStatus(u16),
    /// API answered with an error object carrying this code
    Api(u16),
    /// Body was not valid JSON of the expected shape
    Malformed,
    /// `current.temp_f` absent from the body
    MissingField,
    /// Request URL does not fit in its buffer
    UrlTooLong,
}

/// Errors bringing the network link up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Every join attempt failed; carries the last status
    JoinFailed(u32),
    /// Link did not come up after joining
    LinkTimeout,
    /// No address was assigned
    DhcpTimeout,
}

/// Errors from the time source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Network not configured yet
    NoNetwork,
    /// Socket send/receive failure
    Socket,
    /// No server answered in time
    Timeout,
    /// Response too short or carrying no timestamp
    InvalidResponse,
}

/// Connection to the network the sources talk through
#[allow(async_fn_in_trait)]
pub trait NetworkLink {
    /// Whether the link is joined and has an address
    fn is_up(&self) -> bool;

    /// Join the network and wait for an address
    async fn connect(&mut self) -> Result<(), LinkError>;
}

/// Source of current weather conditions
#[allow(async_fn_in_trait)]
pub trait WeatherSource {
    /// Fetch the current conditions for the configured location
    async fn fetch_current(&mut self) -> Result<CurrentConditions, WeatherError>;
}

/// Source of wall clock time
#[allow(async_fn_in_trait)]
pub trait TimeSource {
    /// Query the current time, returned as Unix seconds
    async fn sync(&mut self) -> Result<u64, ClockError>;
}
