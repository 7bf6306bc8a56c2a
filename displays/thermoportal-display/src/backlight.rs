//! Backlight level
//!
//! Levels run from 0.0 (off) to 1.0 (full brightness). Out-of-range
//! requests are clamped rather than rejected.

/// Clamped backlight level
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Backlight {
    level: f32,
}

impl Backlight {
    /// Create a backlight level, clamped into 0.0 - 1.0 (NaN is off)
    pub fn new(level: f32) -> Self {
        let level = if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, 1.0)
        };
        Self { level }
    }

    /// Current level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// PWM compare value for a counter running 0..=top
    pub fn duty(&self, top: u16) -> u16 {
        (self.level * top as f32 + 0.5) as u16
    }
}
