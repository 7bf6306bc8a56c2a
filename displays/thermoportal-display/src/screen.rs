//! Retained screen model
//!
//! A `Screen` is the root group. It owns views, each a group of labels that
//! is shown or hidden as a unit. Mutations mark the screen dirty; rendering
//! redraws everything visible and marks it clean again.

use embedded_graphics::pixelcolor::Rgb565;
use heapless::Vec;

use crate::backend::{DisplayBackend, DisplayError};
use crate::label::Label;

/// Maximum number of views on a screen
pub const MAX_VIEWS: usize = 4;

/// Maximum number of labels per view
pub const MAX_LABELS: usize = 8;

/// Handle to a view on a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ViewId(u8);

/// Handle to a label within a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LabelId {
    view: u8,
    index: u8,
}

struct View {
    labels: Vec<Label, MAX_LABELS>,
    visible: bool,
}

/// Root display group
pub struct Screen {
    background: Rgb565,
    views: Vec<View, MAX_VIEWS>,
    dirty: bool,
}

impl Screen {
    /// Create an empty screen filled with `background`
    pub fn new(background: Rgb565) -> Self {
        Self {
            background,
            views: Vec::new(),
            dirty: true,
        }
    }

    /// Add a new, hidden view
    pub fn add_view(&mut self) -> Result<ViewId, DisplayError> {
        let id = ViewId(self.views.len() as u8);
        self.views
            .push(View {
                labels: Vec::new(),
                visible: false,
            })
            .map_err(|_| DisplayError::BufferOverflow)?;
        Ok(id)
    }

    /// Append a label to a view
    pub fn add_label(&mut self, view: ViewId, label: Label) -> Result<LabelId, DisplayError> {
        let group = self
            .views
            .get_mut(view.0 as usize)
            .ok_or(DisplayError::NotFound)?;
        let index = group.labels.len() as u8;
        group
            .labels
            .push(label)
            .map_err(|_| DisplayError::BufferOverflow)?;
        if group.visible {
            self.dirty = true;
        }
        Ok(LabelId {
            view: view.0,
            index,
        })
    }

    /// Look up a label
    pub fn label(&self, id: LabelId) -> Option<&Label> {
        self.views
            .get(id.view as usize)
            .and_then(|v| v.labels.get(id.index as usize))
    }

    /// Mutable access to a label
    ///
    /// Marks the screen dirty, since the caller is about to change it.
    pub fn label_mut(&mut self, id: LabelId) -> Option<&mut Label> {
        let label = self
            .views
            .get_mut(id.view as usize)
            .and_then(|v| v.labels.get_mut(id.index as usize))?;
        self.dirty = true;
        Some(label)
    }

    /// Replace a label's text
    ///
    /// Setting identical text leaves the screen clean. Text that does not fit
    /// is stored truncated and reported as `BufferOverflow`.
    pub fn set_text(&mut self, id: LabelId, text: &str) -> Result<(), DisplayError> {
        let label = self
            .views
            .get_mut(id.view as usize)
            .and_then(|v| v.labels.get_mut(id.index as usize))
            .ok_or(DisplayError::NotFound)?;
        if label.text() == text {
            return Ok(());
        }
        let fits = label.set_text(text);
        self.dirty = true;
        if fits {
            Ok(())
        } else {
            Err(DisplayError::BufferOverflow)
        }
    }

    /// Make a view visible; showing a visible view does nothing
    pub fn show(&mut self, view: ViewId) -> Result<(), DisplayError> {
        self.set_visible(view, true)
    }

    /// Hide a view; hiding a hidden view does nothing
    pub fn hide(&mut self, view: ViewId) -> Result<(), DisplayError> {
        self.set_visible(view, false)
    }

    fn set_visible(&mut self, view: ViewId, visible: bool) -> Result<(), DisplayError> {
        let group = self
            .views
            .get_mut(view.0 as usize)
            .ok_or(DisplayError::NotFound)?;
        if group.visible != visible {
            group.visible = visible;
            self.dirty = true;
        }
        Ok(())
    }

    /// Check whether a view is shown
    pub fn is_visible(&self, view: ViewId) -> bool {
        self.views
            .get(view.0 as usize)
            .is_some_and(|v| v.visible)
    }

    /// Iterate over the labels of all visible views, in draw order
    pub fn visible_labels(&self) -> impl Iterator<Item = &Label> {
        self.views
            .iter()
            .filter(|v| v.visible)
            .flat_map(|v| v.labels.iter())
    }

    /// Check if screen needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Redraw the screen if it changed
    ///
    /// Returns whether anything was drawn. The screen stays dirty if drawing
    /// fails, so the next call retries.
    pub fn render<B: DisplayBackend>(&mut self, backend: &mut B) -> Result<bool, DisplayError> {
        if !self.dirty {
            return Ok(false);
        }

        backend.clear(self.background)?;
        for label in self.visible_labels() {
            backend.draw_text(label.x, label.y, label.text(), label.color)?;
        }
        backend.flush()?;

        self.dirty = false;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, GREEN, WHITE};
    use std::string::{String, ToString};
    use std::vec::Vec as StdVec;

    #[derive(Debug, PartialEq)]
    enum Op {
        Clear(Rgb565),
        Text(i32, i32, String),
        Flush,
    }

    #[derive(Default)]
    struct Recorder {
        ops: StdVec<Op>,
        fail: bool,
    }

    impl DisplayBackend for Recorder {
        fn clear(&mut self, color: Rgb565) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Communication);
            }
            self.ops.push(Op::Clear(color));
            Ok(())
        }

        fn draw_text(
            &mut self,
            x: i32,
            y: i32,
            text: &str,
            _color: Rgb565,
        ) -> Result<(), DisplayError> {
            self.ops.push(Op::Text(x, y, text.to_string()));
            Ok(())
        }

        fn flush(&mut self) -> Result<(), DisplayError> {
            self.ops.push(Op::Flush);
            Ok(())
        }

        fn dimensions(&self) -> (u16, u16) {
            (320, 240)
        }
    }

    fn screen_with_label() -> (Screen, ViewId, LabelId) {
        let mut screen = Screen::new(BLACK);
        let view = screen.add_view().unwrap();
        let id = screen
            .add_label(view, Label::new(1, 2, "hello", GREEN))
            .unwrap();
        (screen, view, id)
    }

    #[test]
    fn test_hidden_view_not_drawn() {
        let (mut screen, _, _) = screen_with_label();
        let mut backend = Recorder::default();

        assert!(screen.render(&mut backend).unwrap());
        assert_eq!(backend.ops, [Op::Clear(BLACK), Op::Flush]);
        assert!(!screen.is_dirty());
    }

    #[test]
    fn test_render_visible_labels() {
        let (mut screen, view, _) = screen_with_label();
        screen.show(view).unwrap();
        let mut backend = Recorder::default();

        screen.render(&mut backend).unwrap();
        assert_eq!(
            backend.ops,
            [
                Op::Clear(BLACK),
                Op::Text(1, 2, "hello".to_string()),
                Op::Flush
            ]
        );

        // Clean screen draws nothing
        backend.ops.clear();
        assert!(!screen.render(&mut backend).unwrap());
        assert!(backend.ops.is_empty());
    }

    #[test]
    fn test_show_hide_idempotent() {
        let (mut screen, view, _) = screen_with_label();
        screen.show(view).unwrap();
        screen.render(&mut Recorder::default()).unwrap();

        screen.show(view).unwrap();
        assert!(!screen.is_dirty());

        screen.hide(view).unwrap();
        assert!(screen.is_dirty());
        assert!(!screen.is_visible(view));

        screen.render(&mut Recorder::default()).unwrap();
        screen.hide(view).unwrap();
        assert!(!screen.is_dirty());
    }

    #[test]
    fn test_set_text_dirty_only_on_change() {
        let (mut screen, view, id) = screen_with_label();
        screen.show(view).unwrap();
        screen.render(&mut Recorder::default()).unwrap();

        screen.set_text(id, "hello").unwrap();
        assert!(!screen.is_dirty());

        screen.set_text(id, "world").unwrap();
        assert!(screen.is_dirty());
        assert_eq!(screen.label(id).unwrap().text(), "world");
    }

    #[test]
    fn test_set_text_overflow_keeps_prefix() {
        let (mut screen, _, id) = screen_with_label();
        let long = "x".repeat(crate::label::LABEL_LEN + 4);
        assert_eq!(
            screen.set_text(id, &long),
            Err(DisplayError::BufferOverflow)
        );
        assert_eq!(
            screen.label(id).unwrap().text().len(),
            crate::label::LABEL_LEN
        );
    }

    #[test]
    fn test_unknown_ids() {
        let mut screen = Screen::new(BLACK);
        let mut other = Screen::new(BLACK);
        let view = other.add_view().unwrap();
        let id = other.add_label(view, Label::new(0, 0, "", WHITE)).unwrap();

        assert_eq!(screen.show(view), Err(DisplayError::NotFound));
        assert_eq!(screen.set_text(id, "x"), Err(DisplayError::NotFound));
        assert!(screen.label_mut(id).is_none());
        assert_eq!(
            screen.add_label(view, Label::new(0, 0, "", WHITE)),
            Err(DisplayError::NotFound)
        );
    }

    #[test]
    fn test_capacity_limits() {
        let mut screen = Screen::new(BLACK);
        for _ in 0..MAX_VIEWS {
            screen.add_view().unwrap();
        }
        assert_eq!(screen.add_view(), Err(DisplayError::BufferOverflow));

        let view = ViewId(0);
        for _ in 0..MAX_LABELS {
            screen.add_label(view, Label::new(0, 0, "", WHITE)).unwrap();
        }
        assert_eq!(
            screen.add_label(view, Label::new(0, 0, "", WHITE)),
            Err(DisplayError::BufferOverflow)
        );
    }

    #[test]
    fn test_failed_render_stays_dirty() {
        let (mut screen, _, _) = screen_with_label();
        let mut backend = Recorder {
            fail: true,
            ..Default::default()
        };
        assert_eq!(
            screen.render(&mut backend),
            Err(DisplayError::Communication)
        );
        assert!(screen.is_dirty());
    }
}
