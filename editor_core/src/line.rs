//! Fixed-capacity line and single-line edits

use crate::error::EditError;
use crate::limits::{LINE_CAPACITY, SENTINEL};
use crate::mode::EditMode;

/// Range of byte columns touched by an edit, `start..end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One row of text
///
/// Bytes at and after `len` always hold `SENTINEL`, so the raw bytes can be
/// written to flash as-is and the length recovered by scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Line {
    bytes: [u8; LINE_CAPACITY],
    len: usize,
}

impl Line {
    pub const EMPTY: Line = Line {
        bytes: [SENTINEL; LINE_CAPACITY],
        len: 0,
    };

    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Decode a line from its stored form
    ///
    /// The length is the offset of the first sentinel, or the full capacity if
    /// there is none. Anything after the first sentinel is dropped.
    pub fn from_raw(raw: &[u8]) -> Self {
        let mut line = Self::EMPTY;
        for &byte in raw.iter().take(LINE_CAPACITY) {
            if byte == SENTINEL {
                break;
            }
            line.bytes[line.len] = byte;
            line.len += 1;
        }
        line
    }

    /// Build a line from text, `None` if it does not fit or contains the sentinel
    pub fn from_text(text: &[u8]) -> Option<Self> {
        if text.len() > LINE_CAPACITY || text.contains(&SENTINEL) {
            return None;
        }
        let mut line = Self::EMPTY;
        line.bytes[..text.len()].copy_from_slice(text);
        line.len = text.len();
        Some(line)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == LINE_CAPACITY
    }

    /// Free bytes left on this line
    pub fn spare(&self) -> usize {
        LINE_CAPACITY - self.len
    }

    /// The text, without sentinel padding
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The stored form, sentinel padding included
    pub fn raw(&self) -> &[u8; LINE_CAPACITY] {
        &self.bytes
    }

    pub fn clear(&mut self) {
        *self = Self::EMPTY;
    }

    /// Add `ch` at column `col`
    ///
    /// At the end of the line the character is appended in either mode. On an
    /// existing character, `ShiftInsert` moves the rest of the line right and
    /// `Overwrite` replaces it. A full line, or a column past the end, is
    /// refused so no gap or overflow is ever created.
    pub fn insert_char(&mut self, col: usize, ch: u8, mode: EditMode) -> Result<Span, EditError> {
        if col > self.len || self.is_full() {
            return Err(EditError::CapacityExceeded);
        }

        if col == self.len {
            self.bytes[col] = ch;
            self.len += 1;
            return Ok(Span::new(col, col + 1));
        }

        match mode {
            EditMode::ShiftInsert => {
                self.bytes.copy_within(col..self.len, col + 1);
                self.bytes[col] = ch;
                self.len += 1;
                Ok(Span::new(col, self.len))
            }
            EditMode::Overwrite => {
                self.bytes[col] = ch;
                Ok(Span::new(col, col + 1))
            }
        }
    }

    /// Remove the character at `col`, closing the gap
    ///
    /// Returns `None` when there is no character at `col`.
    pub fn delete_at(&mut self, col: usize) -> Option<Span> {
        if col >= self.len {
            return None;
        }
        let old_len = self.len;
        self.bytes.copy_within(col + 1..old_len, col);
        self.len -= 1;
        self.bytes[self.len] = SENTINEL;
        Some(Span::new(col, old_len))
    }

    /// Remove and return the last character
    pub(crate) fn pop(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let last = self.bytes[self.len];
        self.bytes[self.len] = SENTINEL;
        Some(last)
    }

    /// Put `byte` at column 0, shifting everything right
    ///
    /// A full line pushes its last character out and returns it.
    pub(crate) fn push_front(&mut self, byte: u8) -> Option<u8> {
        let ejected = if self.is_full() { self.pop() } else { None };
        self.bytes.copy_within(0..self.len, 1);
        self.bytes[0] = byte;
        self.len += 1;
        ejected
    }

    /// Append the text of `other`; the caller guarantees it fits
    pub(crate) fn append(&mut self, other: &Line) {
        debug_assert!(other.len <= self.spare());
        self.bytes[self.len..self.len + other.len].copy_from_slice(other.as_bytes());
        self.len += other.len;
    }

    /// Cut the line at `col`, returning the tail as a new line
    pub(crate) fn split_off(&mut self, col: usize) -> Line {
        let tail = Line::from_raw(&self.bytes[col..self.len]);
        self.bytes[col..].fill(SENTINEL);
        self.len = col;
        tail
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::EMPTY
    }
}
