//! Compile-time device configuration
//!
//! The device has no runtime configuration surface. Intervals, layout and
//! the weather location are fixed here; secrets come from the firmware build.

/// Clock sync interval (1 hour)
pub const CLOCK_SYNC_INTERVAL_MS: u64 = 3_600_000;

/// Weather fetch interval (10 minutes)
pub const WEATHER_REFRESH_INTERVAL_MS: u64 = 600_000;

/// Delay between control loop iterations
pub const LOOP_PERIOD_MS: u64 = 1_000;

/// Location passed as the `q` parameter of the weather query
pub const WEATHER_LOCATION: &str = "98002";

/// Screen width in pixels
pub const SCREEN_WIDTH: u16 = 320;

/// Screen height in pixels
pub const SCREEN_HEIGHT: u16 = 240;

/// Left edge of the temperature panels
pub const TABS_X: i32 = 0;

/// Top of the indoor panel
pub const TABS_Y: i32 = 15;

/// Vertical distance between the indoor and outdoor panels
pub const PANEL_SPACING: i32 = 66;

/// Top of the outdoor panel
pub const OUTDOOR_Y: i32 = TABS_Y + PANEL_SPACING;

/// Word wrap width for panel headings
pub const HEADING_MAX_CHARS: usize = 30;

/// Initial backlight level (0.0 - 1.0)
pub const DEFAULT_BACKLIGHT: f32 = 0.1;

/// ADT7410 I2C address on the board
pub const ADT7410_ADDRESS: u8 = 0x48;
