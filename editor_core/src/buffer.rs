//! Resident file content and the multi-line edits built on `Line`

use alloc::vec::Vec;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use crate::damage::{Edit, LineSet};
use crate::error::EditError;
use crate::limits::{LINES_PER_FILE, LINE_CAPACITY};
use crate::line::Line;
use crate::mode::EditMode;

const LAST_LINE: usize = LINES_PER_FILE - 1;

/// Cursor position in the file
///
/// `col == line length` is the append position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
}

impl Cursor {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    pub const fn zero() -> Self {
        Self { line: 0, col: 0 }
    }
}

/// Cursor movements that do not change text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// One column left, wrapping to the end of the previous line
    Left,
    /// One column right, wrapping to the start of the next line
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    /// Up by the given number of lines
    PageUp(usize),
    /// Down by the given number of lines
    PageDown(usize),
    FirstLine,
    LastLine,
}

/// One file's worth of lines
///
/// Logically a single byte stream chunked into fixed-width lines. The number
/// of lines never changes; "removing" a line shifts the rest up and clears
/// the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    lines: [Line; LINES_PER_FILE],
}

impl FileContent {
    /// An empty file
    pub const fn new() -> Self {
        Self {
            lines: [Line::EMPTY; LINES_PER_FILE],
        }
    }

    pub fn from_lines(lines: [Line; LINES_PER_FILE]) -> Self {
        Self { lines }
    }

    /// Build content from leading lines of text, `None` if any does not fit
    pub fn from_text_lines(text: &[&[u8]]) -> Option<Self> {
        if text.len() > LINES_PER_FILE {
            return None;
        }
        let mut content = Self::new();
        for (slot, line) in content.lines.iter_mut().zip(text) {
            *slot = Line::from_text(line)?;
        }
        Some(content)
    }

    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_len(&self, idx: usize) -> usize {
        self.lines.get(idx).map(Line::len).unwrap_or(0)
    }

    /// True when every line is at capacity
    pub fn is_full(&self) -> bool {
        self.lines.iter().all(Line::is_full)
    }

    /// All text as one byte stream, line breaks omitted
    pub fn text(&self) -> Vec<u8> {
        self.lines
            .iter()
            .flat_map(|line| line.as_bytes().iter().copied())
            .collect()
    }

    fn check_cursor(&self, cursor: Cursor) -> Result<(), EditError> {
        match self.lines.get(cursor.line) {
            Some(line) if cursor.col <= line.len() => Ok(()),
            _ => {
                log::trace!("rejecting cursor {}:{}", cursor.line, cursor.col);
                Err(EditError::InvalidCursor)
            }
        }
    }

    /// Type `ch` at `cursor`
    ///
    /// In `ShiftInsert` mode a full cursor line pushes its last character into
    /// the next line, and so on until a line with room absorbs it. The edit is
    /// refused if no line from the cursor down has room.
    pub fn add_char(&mut self, cursor: Cursor, ch: u8, mode: EditMode) -> Result<Edit, EditError> {
        self.check_cursor(cursor)?;
        match mode {
            EditMode::Overwrite => self.overwrite_char(cursor, ch),
            EditMode::ShiftInsert => self.insert_char(cursor, ch),
        }
    }

    fn overwrite_char(&mut self, cursor: Cursor, ch: u8) -> Result<Edit, EditError> {
        let mut at = cursor;
        if at.col == LINE_CAPACITY {
            if at.line == LAST_LINE {
                log::trace!("overwrite past end of file");
                return Err(EditError::CapacityExceeded);
            }
            at = Cursor::new(at.line + 1, 0);
        }

        self.lines[at.line].insert_char(at.col, ch, EditMode::Overwrite)?;
        let mut changed = LineSet::single(at.line);
        changed.insert(cursor.line);
        Ok(Edit::new(Cursor::new(at.line, at.col + 1), changed))
    }

    fn insert_char(&mut self, cursor: Cursor, ch: u8) -> Result<Edit, EditError> {
        let target = (cursor.line..LINES_PER_FILE)
            .find(|&idx| !self.lines[idx].is_full())
            .ok_or_else(|| {
                log::trace!("no line with room below {}", cursor.line);
                EditError::CapacityExceeded
            })?;

        if target == cursor.line {
            self.lines[cursor.line].insert_char(cursor.col, ch, EditMode::ShiftInsert)?;
            return Ok(Edit::new(
                Cursor::new(cursor.line, cursor.col + 1),
                LineSet::single(cursor.line),
            ));
        }

        // The cursor line is full from here on.
        let (mut carry, first_changed, landing) = if cursor.col == LINE_CAPACITY {
            // Typing past the end: the character itself opens the next line.
            (ch, cursor.line + 1, Cursor::new(cursor.line + 1, 1))
        } else {
            let line = &mut self.lines[cursor.line];
            let displaced = line.raw()[LINE_CAPACITY - 1];
            line.pop();
            line.insert_char(cursor.col, ch, EditMode::ShiftInsert)?;
            (
                displaced,
                cursor.line,
                Cursor::new(cursor.line, cursor.col + 1),
            )
        };

        for idx in cursor.line + 1..=target {
            match self.lines[idx].push_front(carry) {
                Some(ejected) => carry = ejected,
                None => break,
            }
        }

        let mut changed = LineSet::range(first_changed, target + 1);
        changed.insert(cursor.line);
        Ok(Edit::new(landing, changed))
    }

    /// Delete the character under the cursor
    ///
    /// At the end of a line this deletes the line break, merging the next line
    /// into this one. The merge is refused if the result would not fit.
    pub fn delete_char(&mut self, cursor: Cursor) -> Result<Edit, EditError> {
        self.check_cursor(cursor)?;

        if self.lines[cursor.line].delete_at(cursor.col).is_some() {
            return Ok(Edit::new(cursor, LineSet::single(cursor.line)));
        }
        if cursor.line == LAST_LINE {
            return Ok(Edit::moved(cursor));
        }

        let next = self.lines[cursor.line + 1];
        if next.len() > self.lines[cursor.line].spare() {
            log::trace!(
                "line {} does not fit after line {}",
                cursor.line + 1,
                cursor.line
            );
            return Err(EditError::CapacityExceeded);
        }

        self.lines[cursor.line].append(&next);
        let mut changed = self.remove_line(cursor.line + 1);
        if !next.is_empty() {
            changed.insert(cursor.line);
        }
        Ok(Edit::new(cursor, changed))
    }

    /// Delete the character before the cursor
    ///
    /// At the start of a line this merges the line into the previous one. If
    /// that merge does not fit, the cursor still moves to the end of the
    /// previous line and nothing is deleted.
    pub fn backspace(&mut self, cursor: Cursor) -> Result<Edit, EditError> {
        self.check_cursor(cursor)?;

        if cursor.col > 0 {
            let at = Cursor::new(cursor.line, cursor.col - 1);
            self.lines[at.line].delete_at(at.col);
            return Ok(Edit::new(at, LineSet::single(at.line)));
        }
        if cursor.line == 0 {
            return Ok(Edit::moved(cursor));
        }

        let at = Cursor::new(cursor.line - 1, self.lines[cursor.line - 1].len());
        match self.delete_char(at) {
            Err(EditError::CapacityExceeded) => Ok(Edit::moved(at)),
            result => result,
        }
    }

    /// Break the line at the cursor
    ///
    /// Needs an empty line somewhere below the cursor: lines down to it shift
    /// one down and the text after the cursor moves into the freed line.
    pub fn split_line(&mut self, cursor: Cursor) -> Result<Edit, EditError> {
        self.check_cursor(cursor)?;

        let empty = (cursor.line + 1..LINES_PER_FILE)
            .find(|&idx| self.lines[idx].is_empty())
            .ok_or_else(|| {
                log::trace!("no empty line below {}", cursor.line);
                EditError::CapacityExceeded
            })?;

        let mut changed = LineSet::empty();
        for idx in (cursor.line + 2..=empty).rev() {
            if self.lines[idx] != self.lines[idx - 1] {
                changed.insert(idx);
            }
            self.lines[idx] = self.lines[idx - 1];
        }

        let tail = self.lines[cursor.line].split_off(cursor.col);
        if !tail.is_empty() {
            changed.insert(cursor.line);
        }
        if self.lines[cursor.line + 1] != tail {
            changed.insert(cursor.line + 1);
        }
        self.lines[cursor.line + 1] = tail;

        Ok(Edit::new(Cursor::new(cursor.line + 1, 0), changed))
    }

    /// Where `motion` takes the cursor
    pub fn apply_motion(&self, cursor: Cursor, motion: Motion) -> Result<Cursor, EditError> {
        self.check_cursor(cursor)?;

        let clamped = |line: usize| Cursor::new(line, cursor.col.min(self.lines[line].len()));
        let moved = match motion {
            Motion::Left if cursor.col > 0 => Cursor::new(cursor.line, cursor.col - 1),
            Motion::Left if cursor.line > 0 => {
                Cursor::new(cursor.line - 1, self.lines[cursor.line - 1].len())
            }
            Motion::Right if cursor.col < self.lines[cursor.line].len() => {
                Cursor::new(cursor.line, cursor.col + 1)
            }
            Motion::Right if cursor.line < LAST_LINE => Cursor::new(cursor.line + 1, 0),
            Motion::Left | Motion::Right => cursor,
            Motion::Up => clamped(cursor.line.saturating_sub(1)),
            Motion::Down => clamped((cursor.line + 1).min(LAST_LINE)),
            Motion::PageUp(rows) => clamped(cursor.line.saturating_sub(rows)),
            Motion::PageDown(rows) => clamped(cursor.line.saturating_add(rows).min(LAST_LINE)),
            Motion::LineStart => Cursor::new(cursor.line, 0),
            Motion::LineEnd => Cursor::new(cursor.line, self.lines[cursor.line].len()),
            Motion::FirstLine => Cursor::zero(),
            Motion::LastLine => Cursor::new(LAST_LINE, 0),
        };
        Ok(moved)
    }

    /// Drop line `idx`, shifting later lines up and clearing the last
    fn remove_line(&mut self, idx: usize) -> LineSet {
        let mut changed = LineSet::empty();
        for i in idx..LAST_LINE {
            if self.lines[i] != self.lines[i + 1] {
                changed.insert(i);
            }
            self.lines[i] = self.lines[i + 1];
        }
        if !self.lines[LAST_LINE].is_empty() {
            changed.insert(LAST_LINE);
        }
        self.lines[LAST_LINE].clear();
        changed
    }
}

impl Default for FileContent {
    fn default() -> Self {
        Self::new()
    }
}
