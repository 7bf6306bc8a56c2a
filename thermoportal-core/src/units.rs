//! Temperature unit helpers
//!
//! Sensor readings arrive as `i16` Celsius in 1/128° steps (the ADT7410's
//! native resolution) and are converted to whole Fahrenheit in one rounding
//! step. Outdoor readings are carried as tenths (455 = 45.5°).

use core::fmt;

/// Fixed-point steps per degree of a sensor reading
pub const X128_PER_DEGREE: i32 = 128;

/// Convert Celsius in 1/128° steps to whole Fahrenheit
///
/// `F = C * 1.8 + 32`, rounded once with ties to even, which is what
/// `{:.0}` does to the same value.
pub fn celsius_x128_to_fahrenheit(celsius_x128: i16) -> i16 {
    // F = (C_x128 * 9 + 32 * 640) / 640
    let denominator = X128_PER_DEGREE * 5;
    let numerator = celsius_x128 as i32 * 9 + 32 * denominator;
    div_round_even(numerator, denominator) as i16
}

/// Integer division rounding to nearest, ties to even
fn div_round_even(numerator: i32, denominator: i32) -> i32 {
    let quotient = numerator.div_euclid(denominator);
    let twice_remainder = numerator.rem_euclid(denominator) * 2;
    if twice_remainder > denominator || (twice_remainder == denominator && quotient % 2 != 0) {
        quotient + 1
    } else {
        quotient
    }
}

/// Convert a floating point temperature into tenths
///
/// Saturates at the `i16` range. NaN maps to zero.
pub fn to_x10(value: f32) -> i16 {
    if value.is_nan() {
        return 0;
    }
    let scaled = value * 10.0;
    let rounded = if scaled >= 0.0 {
        scaled + 0.5
    } else {
        scaled - 0.5
    };
    if rounded >= i16::MAX as f32 {
        i16::MAX
    } else if rounded <= i16::MIN as f32 {
        i16::MIN
    } else {
        rounded as i16
    }
}

/// Formats tenths with one decimal place (`-3.5`, `52.0`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tenths(pub i16);

impl fmt::Display for Tenths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0 as i32;
        let sign = if value < 0 { "-" } else { "" };
        let abs = value.abs();
        write!(f, "{}{}.{}", sign, abs / 10, abs % 10)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Tenths {
    fn format(&self, f: defmt::Formatter) {
        let value = self.0 as i32;
        let sign = if value < 0 { "-" } else { "" };
        let abs = value.abs();
        defmt::write!(f, "{}{}.{}", sign, abs / 10, abs % 10);
    }
}
