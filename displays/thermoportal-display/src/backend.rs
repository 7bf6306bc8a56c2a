//! Display backend trait
//!
//! Defines the interface the screen renders through, plus an implementation
//! for any `embedded-graphics` draw target.

use embedded_graphics::mono_font::{iso_8859_1::FONT_10X20, MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

/// Font used for all labels (ISO-8859-1 so `°` renders)
pub const FONT: MonoFont<'static> = FONT_10X20;

/// Distance between text lines in pixels
pub const LINE_HEIGHT: i32 = 20;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Label or view identifier does not exist
    NotFound,
    /// Buffer overflow
    BufferOverflow,
}

/// Display backend trait
///
/// Provides a hardware-agnostic interface for rendering text labels.
pub trait DisplayBackend {
    /// Fill the entire display with a color
    fn clear(&mut self, color: Rgb565) -> Result<(), DisplayError>;

    /// Draw text with its first line vertically centered on `y`
    ///
    /// Text may contain `\n`; following lines are placed `LINE_HEIGHT` below.
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Rgb565) -> Result<(), DisplayError>;

    /// Flush buffered content to the display
    ///
    /// For displays with internal buffers, this sends the buffer to the hardware.
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Get the display dimensions in pixels
    fn dimensions(&self) -> (u16, u16);
}

/// Backend drawing onto an `embedded-graphics` target
///
/// Unbuffered targets such as `mipidsi` panels draw immediately, so `flush`
/// is a no-op.
pub struct GraphicsBackend<D> {
    target: D,
}

impl<D> GraphicsBackend<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    /// Wrap a draw target
    pub fn new(target: D) -> Self {
        Self { target }
    }
}

impl<D> DisplayBackend for GraphicsBackend<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn clear(&mut self, color: Rgb565) -> Result<(), DisplayError> {
        self.target
            .clear(color)
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Rgb565) -> Result<(), DisplayError> {
        let style = MonoTextStyle::new(&FONT, color);
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Middle)
            .draw(&mut self.target)
            .map(|_| ())
            .map_err(|_| DisplayError::Communication)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn dimensions(&self) -> (u16, u16) {
        let size = self.target.bounding_box().size;
        (size.width as u16, size.height as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, GREEN};
    use embedded_graphics::mock_display::MockDisplay;

    fn mock() -> MockDisplay<Rgb565> {
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        display.set_allow_out_of_bounds_drawing(true);
        display
    }

    fn count_pixels(display: &MockDisplay<Rgb565>, color: Rgb565) -> usize {
        let mut count = 0;
        for y in 0..64 {
            for x in 0..64 {
                if display.get_pixel(Point::new(x, y)) == Some(color) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_line_height_matches_font() {
        assert_eq!(FONT.character_size.height as i32, LINE_HEIGHT);
    }

    #[test]
    fn test_draw_text() {
        let mut backend = GraphicsBackend::new(mock());
        backend.clear(BLACK).unwrap();
        backend.draw_text(0, 10, "M", GREEN).unwrap();
        backend.flush().unwrap();

        let display = backend.target;
        assert!(count_pixels(&display, GREEN) > 0);
        assert_eq!(display.get_pixel(Point::new(63, 63)), Some(BLACK));
    }

    #[test]
    fn test_multiline_text_reaches_second_line() {
        let mut backend = GraphicsBackend::new(mock());
        backend.clear(BLACK).unwrap();
        backend.draw_text(0, 10, "\nM", GREEN).unwrap();

        let display = backend.target;
        // First line is empty, so nothing green above the second line
        for y in 0..LINE_HEIGHT {
            for x in 0..64 {
                assert_ne!(display.get_pixel(Point::new(x, y)), Some(GREEN));
            }
        }
        assert!(count_pixels(&display, GREEN) > 0);
    }

    #[test]
    fn test_dimensions() {
        let backend = GraphicsBackend::new(mock());
        assert_eq!(backend.dimensions(), (64, 64));
    }
}
