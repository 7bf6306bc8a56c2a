//! Weather API query and response handling
//!
//! The device talks to the weatherapi.com "current" endpoint:
//!
//! ```text
//! GET https://api.weatherapi.com/v1/current.json?key=<key>&q=<location>&aqi=no
//! ```
//!
//! Only `current.temp_f` is required from the response. A few other fields
//! are picked up when present so the firmware can log them.

use core::fmt::Write;

use heapless::String;
use serde::Deserialize;

use crate::config::WEATHER_LOCATION;
use crate::traits::WeatherError;
use crate::units::to_x10;

/// API endpoint for current conditions
pub const CURRENT_ENDPOINT: &str = "https://api.weatherapi.com/v1/current.json";

/// Maximum request URL length
pub const MAX_URL_LEN: usize = 256;

/// Maximum stored length of short text fields
pub const MAX_TEXT_LEN: usize = 32;

/// Fixed query parameters for the weather request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeatherQuery<'a> {
    /// Location query (zip code, city name or "lat,lon")
    pub location: &'a str,
    /// Whether to request air quality data
    pub air_quality: bool,
}

impl Default for WeatherQuery<'static> {
    fn default() -> Self {
        Self {
            location: WEATHER_LOCATION,
            air_quality: false,
        }
    }
}

impl WeatherQuery<'_> {
    /// Build the full request URL with the API key embedded
    pub fn url(&self, api_key: &str) -> Result<String<MAX_URL_LEN>, WeatherError> {
        let mut url = String::new();
        write!(
            url,
            "{}?key={}&q={}&aqi={}",
            CURRENT_ENDPOINT,
            api_key,
            self.location,
            if self.air_quality { "yes" } else { "no" }
        )
        .map_err(|_| WeatherError::UrlTooLong)?;
        Ok(url)
    }
}

/// Current conditions extracted from a response
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurrentConditions {
    /// Outdoor temperature in Fahrenheit tenths
    pub temp_f_x10: i16,
    /// Outdoor temperature in Celsius tenths, when reported
    pub temp_c_x10: Option<i16>,
    /// Short condition description ("Partly cloudy")
    pub condition: String<MAX_TEXT_LEN>,
    /// Resolved location name
    pub location: String<MAX_TEXT_LEN>,
}

impl CurrentConditions {
    /// Conditions carrying only a Fahrenheit reading
    pub fn from_fahrenheit_x10(temp_f_x10: i16) -> Self {
        Self {
            temp_f_x10,
            temp_c_x10: None,
            condition: String::new(),
            location: String::new(),
        }
    }
}

#[derive(Deserialize)]
struct Body {
    current: Option<Current>,
    location: Option<Location>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Current {
    temp_f: Option<f32>,
    temp_c: Option<f32>,
    condition: Option<Condition>,
}

#[derive(Deserialize)]
struct Condition {
    text: alloc::string::String,
}

#[derive(Deserialize)]
struct Location {
    name: alloc::string::String,
}

#[derive(Deserialize)]
struct ApiError {
    code: u16,
}

/// Parse a current-conditions response body
pub fn parse_current(body: &[u8]) -> Result<CurrentConditions, WeatherError> {
    let body: Body = serde_json::from_slice(body).map_err(|_| WeatherError::Malformed)?;

    if let Some(error) = body.error {
        return Err(WeatherError::Api(error.code));
    }

    let current = body.current.ok_or(WeatherError::MissingField)?;
    let temp_f = current.temp_f.ok_or(WeatherError::MissingField)?;

    let mut conditions = CurrentConditions::from_fahrenheit_x10(to_x10(temp_f));
    conditions.temp_c_x10 = current.temp_c.map(to_x10);
    if let Some(condition) = current.condition {
        conditions.condition = truncated(&condition.text);
    }
    if let Some(location) = body.location {
        conditions.location = truncated(&location.name);
    }
    Ok(conditions)
}

/// Interpret an HTTP reply from the current-conditions endpoint
///
/// weatherapi.com reports bad keys and locations as a JSON error object with
/// a 4xx status, so the body is parsed whatever the status. A non-2xx reply
/// whose body says nothing useful becomes [`WeatherError::HttpStatus`].
pub fn parse_reply(status: u16, body: &[u8]) -> Result<CurrentConditions, WeatherError> {
    let success = (200..300).contains(&status);
    match parse_current(body) {
        Err(WeatherError::Malformed | WeatherError::MissingField) if !success => {
            Err(WeatherError::HttpStatus(status))
        }
        Ok(_) if !success => Err(WeatherError::HttpStatus(status)),
        result => result,
    }
}

/// Copy as much of `text` as fits, on a char boundary
fn truncated(text: &str) -> String<MAX_TEXT_LEN> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "location": {"name": "Auburn", "region": "Washington", "country": "USA"},
        "current": {
            "last_updated_epoch": 1700000000,
            "temp_c": 9.4,
            "temp_f": 48.9,
            "is_day": 1,
            "condition": {"text": "Partly cloudy", "code": 1003}
        }
    }"#;

    #[test]
    fn test_default_url() {
        let url = WeatherQuery::default().url("abc123").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.weatherapi.com/v1/current.json?key=abc123&q=98002&aqi=no"
        );
    }

    #[test]
    fn test_url_with_air_quality() {
        let query = WeatherQuery {
            location: "47.3,-122.2",
            air_quality: true,
        };
        let url = query.url("k").unwrap();
        assert!(url.ends_with("?key=k&q=47.3,-122.2&aqi=yes"));
    }

    #[test]
    fn test_url_too_long() {
        let key = [b'x'; MAX_URL_LEN];
        let key = core::str::from_utf8(&key).unwrap();
        assert_eq!(
            WeatherQuery::default().url(key),
            Err(WeatherError::UrlTooLong)
        );
    }

    #[test]
    fn test_parse_sample() {
        let conditions = parse_current(SAMPLE.as_bytes()).unwrap();
        assert_eq!(conditions.temp_f_x10, 489);
        assert_eq!(conditions.temp_c_x10, Some(94));
        assert_eq!(conditions.condition.as_str(), "Partly cloudy");
        assert_eq!(conditions.location.as_str(), "Auburn");
    }

    #[test]
    fn test_parse_minimal() {
        let conditions = parse_current(br#"{"current": {"temp_f": -4}}"#).unwrap();
        assert_eq!(conditions, CurrentConditions::from_fahrenheit_x10(-40));
    }

    #[test]
    fn test_missing_temp() {
        assert_eq!(
            parse_current(br#"{"current": {"temp_c": 3.0}}"#),
            Err(WeatherError::MissingField)
        );
        assert_eq!(
            parse_current(br#"{"location": {"name": "x"}}"#),
            Err(WeatherError::MissingField)
        );
    }

    #[test]
    fn test_malformed() {
        assert_eq!(parse_current(b"<html>"), Err(WeatherError::Malformed));
        assert_eq!(parse_current(b""), Err(WeatherError::Malformed));
        assert_eq!(
            parse_current(br#"{"current": {"temp_f": "warm"}}"#),
            Err(WeatherError::Malformed)
        );
    }

    #[test]
    fn test_api_error_body() {
        let body = br#"{"error": {"code": 2006, "message": "API key is invalid."}}"#;
        assert_eq!(parse_current(body), Err(WeatherError::Api(2006)));
    }

    #[test]
    fn test_long_condition_truncated() {
        let body = br#"{"current": {"temp_f": 50.0, "condition": {"text": "Patchy light rain with thunder in the area"}}}"#;
        let conditions = parse_current(body).unwrap();
        assert_eq!(conditions.condition.len(), MAX_TEXT_LEN);
        assert!(conditions.condition.starts_with("Patchy light rain"));
    }

    #[test]
    fn test_reply_success() {
        let conditions = parse_reply(200, SAMPLE.as_bytes()).unwrap();
        assert_eq!(conditions.temp_f_x10, 489);
    }

    #[test]
    fn test_reply_api_error_status() {
        let body = br#"{"error": {"code": 2008, "message": "API key has been disabled."}}"#;
        assert_eq!(parse_reply(403, body), Err(WeatherError::Api(2008)));
    }

    #[test]
    fn test_reply_unparsable_error_status() {
        assert_eq!(
            parse_reply(503, b"<html>Service Unavailable</html>"),
            Err(WeatherError::HttpStatus(503))
        );
        assert_eq!(parse_reply(500, b"{}"), Err(WeatherError::HttpStatus(500)));
    }

    #[test]
    fn test_reply_conditions_with_error_status() {
        // A reading is not trusted when the status says the request failed
        assert_eq!(
            parse_reply(502, SAMPLE.as_bytes()),
            Err(WeatherError::HttpStatus(502))
        );
    }

    #[test]
    fn test_reply_garbage_with_success_status() {
        assert_eq!(parse_reply(200, b"not json"), Err(WeatherError::Malformed));
        assert_eq!(
            parse_reply(200, br#"{"current": {}}"#),
            Err(WeatherError::MissingField)
        );
    }
}
