//! Text layout helpers
//!
//! `wrap_nicely` breaks a string into lines on word boundaries, and
//! `text_box` places wrapped text in a label below a given top edge.

use heapless::{String, Vec};

use crate::backend::DisplayError;
use crate::label::{Label, LABEL_LEN};

/// Maximum number of wrapped lines
pub const MAX_LINES: usize = 8;

/// Maximum bytes per wrapped line
pub const LINE_LEN: usize = 64;

/// Wrapped lines of text
pub type Lines = Vec<String<LINE_LEN>, MAX_LINES>;

/// Greedily wrap `text` into lines of at most `max_chars` characters
///
/// Newlines and carriage returns are dropped before wrapping and runs of
/// spaces collapse to one. A word longer than `max_chars` gets a line of its
/// own rather than being split. Empty input yields a single empty line.
pub fn wrap_nicely(text: &str, max_chars: usize) -> Result<Lines, DisplayError> {
    let mut wrapper = Wrapper {
        lines: Vec::new(),
        line: String::new(),
        line_chars: 0,
        max_chars,
    };
    let mut word: String<LINE_LEN> = String::new();
    let mut word_chars = 0;

    let chars = text
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .chain(core::iter::once(' '));

    for ch in chars {
        if ch == ' ' {
            if word_chars > 0 {
                wrapper.place(&word, word_chars)?;
                word.clear();
                word_chars = 0;
            }
        } else {
            word.push(ch).map_err(|_| DisplayError::BufferOverflow)?;
            word_chars += 1;
        }
    }

    wrapper.finish()
}

struct Wrapper {
    lines: Lines,
    line: String<LINE_LEN>,
    line_chars: usize,
    max_chars: usize,
}

impl Wrapper {
    fn place(&mut self, word: &str, word_chars: usize) -> Result<(), DisplayError> {
        if self.line_chars == 0 {
            self.push_str(word)?;
        } else if self.line_chars + 1 + word_chars <= self.max_chars {
            self.push_str(" ")?;
            self.push_str(word)?;
        } else {
            let done = core::mem::take(&mut self.line);
            self.lines
                .push(done)
                .map_err(|_| DisplayError::BufferOverflow)?;
            self.line_chars = 0;
            self.push_str(word)?;
        }
        Ok(())
    }

    fn push_str(&mut self, s: &str) -> Result<(), DisplayError> {
        self.line
            .push_str(s)
            .map_err(|_| DisplayError::BufferOverflow)?;
        self.line_chars += s.chars().count();
        Ok(())
    }

    fn finish(mut self) -> Result<Lines, DisplayError> {
        self.lines
            .push(self.line)
            .map_err(|_| DisplayError::BufferOverflow)?;
        Ok(self.lines)
    }
}

/// Wrap `text` into `label`, vertically centered on the block below `top`
///
/// Every line is prefixed with a newline, so the first rendered line of the
/// label is blank. The label's `y` becomes `top` plus half the height of the
/// wrapped block.
pub fn text_box(
    label: &mut Label,
    top: i32,
    text: &str,
    max_chars: usize,
    line_height: i32,
) -> Result<(), DisplayError> {
    let lines = wrap_nicely(text, max_chars)?;

    let mut boxed: String<LABEL_LEN> = String::new();
    for line in &lines {
        boxed.push('\n').map_err(|_| DisplayError::BufferOverflow)?;
        boxed
            .push_str(line)
            .map_err(|_| DisplayError::BufferOverflow)?;
    }

    label.y = top + (lines.len() as i32 * line_height) / 2;
    label.set_text(&boxed);
    Ok(())
}
