//! Credentials baked in at build time from `secrets.toml`

/// Wi-Fi network name
pub const WIFI_SSID: &str = env!("THERMOPORTAL_WIFI_SSID");

/// Wi-Fi passphrase
pub const WIFI_PASSWORD: &str = env!("THERMOPORTAL_WIFI_PASSWORD");

/// weatherapi.com key
pub const WEATHER_API_KEY: &str = env!("THERMOPORTAL_API_KEY");
