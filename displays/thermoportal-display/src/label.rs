//! Text labels and temperature panels

use embedded_graphics::pixelcolor::Rgb565;
use heapless::String;

use crate::backend::DisplayError;
use crate::color::GREEN;
use crate::screen::{LabelId, Screen, ViewId};

/// Maximum label text length in bytes
pub const LABEL_LEN: usize = 96;

/// Placeholder shown until a reading arrives
pub const LOADING_TEXT: &str = "Loading..";

/// Horizontal offset of a panel's data label from its heading
pub const DATA_OFFSET_X: i32 = 16;

/// Vertical offset of a panel's data label from its heading
pub const DATA_OFFSET_Y: i32 = 22;

/// A positioned, colored piece of (possibly multi-line) text
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Left edge in pixels
    pub x: i32,
    /// Vertical center of the first line in pixels
    pub y: i32,
    /// Text color
    pub color: Rgb565,
    text: String<LABEL_LEN>,
}

impl Label {
    /// Create a label with initial text
    ///
    /// Text beyond `LABEL_LEN` bytes is dropped.
    pub fn new(x: i32, y: i32, text: &str, color: Rgb565) -> Self {
        let mut label = Self {
            x,
            y,
            color,
            text: String::new(),
        };
        label.set_text(text);
        label
    }

    /// Replace the text, truncating on a char boundary if needed
    ///
    /// Returns `false` if the text was truncated.
    pub fn set_text(&mut self, text: &str) -> bool {
        self.text.clear();
        for ch in text.chars() {
            if self.text.push(ch).is_err() {
                return false;
            }
        }
        true
    }

    /// Current text
    pub fn text(&self) -> &str {
        self.text.as_str()
    }
}

/// A heading label with a data label below and to the right of it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperaturePanel {
    /// Heading label
    pub heading: LabelId,
    /// Reading label
    pub data: LabelId,
}

impl TemperaturePanel {
    /// Add a panel with its heading at `(x, y)` to a view
    ///
    /// Both labels start out green, showing the loading placeholder.
    pub fn new(screen: &mut Screen, view: ViewId, x: i32, y: i32) -> Result<Self, DisplayError> {
        let heading = screen.add_label(view, Label::new(x, y, LOADING_TEXT, GREEN))?;
        let data = screen.add_label(
            view,
            Label::new(x + DATA_OFFSET_X, y + DATA_OFFSET_Y, LOADING_TEXT, GREEN),
        )?;
        Ok(Self { heading, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::WHITE;

    #[test]
    fn test_set_text_truncates() {
        let mut label = Label::new(0, 0, "", WHITE);
        let long = "°".repeat(LABEL_LEN); // 2 bytes each
        assert!(!label.set_text(&long));
        assert_eq!(label.text().len(), LABEL_LEN);
        assert!(label.text().chars().all(|c| c == '°'));
    }

    #[test]
    fn test_panel_layout() {
        let mut screen = Screen::new(crate::color::BLACK);
        let view = screen.add_view().unwrap();
        let panel = TemperaturePanel::new(&mut screen, view, 0, 15).unwrap();

        let heading = screen.label(panel.heading).unwrap();
        let data = screen.label(panel.data).unwrap();
        assert_eq!((heading.x, heading.y), (0, 15));
        assert_eq!((data.x, data.y), (16, 37));
        assert_eq!(data.text(), LOADING_TEXT);
        assert_eq!(data.color, GREEN);
    }
}
