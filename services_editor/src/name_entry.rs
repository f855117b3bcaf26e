//! Single-line prompt for naming a file

use editor_core::{EditMode, Line, NameSlot, Span};

use crate::error::{is_printable, SessionError, SessionResult};

/// Bytes the directory screen uses to draw "<Empty slot>"
const RESERVED: [u8; 2] = [b'<', b'>'];

/// A file name being typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameEntry {
    name: Line,
    cursor: usize,
    mode: EditMode,
}

impl NameEntry {
    /// An empty prompt for a new file
    pub fn new() -> Self {
        Self::default()
    }

    /// A prompt holding `existing`'s name, cursor at its end
    pub fn for_rename(existing: &NameSlot) -> Self {
        let name = Line::from_raw(existing.raw());
        Self {
            cursor: name.len(),
            name,
            mode: EditMode::default(),
        }
    }

    pub fn text(&self) -> &[u8] {
        self.name.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn toggle_mode(&mut self) -> EditMode {
        self.mode = self.mode.toggle();
        self.mode
    }

    /// Type `ch` at the cursor, returning the columns to repaint
    pub fn insert(&mut self, ch: u8) -> SessionResult<Span> {
        if !is_printable(ch) {
            return Err(SessionError::Unprintable(ch));
        }
        if RESERVED.contains(&ch) {
            return Err(SessionError::ReservedChar(ch));
        }
        let span = self.name.insert_char(self.cursor, ch, self.mode)?;
        self.cursor += 1;
        Ok(span)
    }

    /// Delete under the cursor
    pub fn delete(&mut self) -> Option<Span> {
        self.name.delete_at(self.cursor)
    }

    /// Delete before the cursor
    pub fn backspace(&mut self) -> Option<Span> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.name.delete_at(self.cursor)
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.name.len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.name.len();
    }
}
