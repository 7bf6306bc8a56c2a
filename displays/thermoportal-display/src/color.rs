//! Named colors
//!
//! Defined as 24-bit hex values and reduced to the panel's RGB565 format.

use embedded_graphics::pixelcolor::Rgb565;

/// Convert a `0xRRGGBB` value to RGB565
pub const fn from_hex(hex: u32) -> Rgb565 {
    let r = ((hex >> 16) & 0xFF) as u8;
    let g = ((hex >> 8) & 0xFF) as u8;
    let b = (hex & 0xFF) as u8;
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

pub const WHITE: Rgb565 = from_hex(0xFFFFFF);
pub const RED: Rgb565 = from_hex(0xFF0000);
pub const YELLOW: Rgb565 = from_hex(0xFFFF00);
pub const GREEN: Rgb565 = from_hex(0x00FF00);
pub const BLUE: Rgb565 = from_hex(0x0000FF);
pub const PURPLE: Rgb565 = from_hex(0xFF00FF);
pub const BLACK: Rgb565 = from_hex(0x000000);

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::RgbColor;

    #[test]
    fn test_primary_colors() {
        assert_eq!(WHITE, Rgb565::WHITE);
        assert_eq!(BLACK, Rgb565::BLACK);
        assert_eq!(RED, Rgb565::RED);
        assert_eq!(GREEN, Rgb565::GREEN);
        assert_eq!(BLUE, Rgb565::BLUE);
        assert_eq!(YELLOW, Rgb565::YELLOW);
        assert_eq!(PURPLE, Rgb565::MAGENTA);
    }

    #[test]
    fn test_channel_truncation() {
        let c = from_hex(0x84_82_08);
        assert_eq!((c.r(), c.g(), c.b()), (0x10, 0x20, 0x01));
    }
}
