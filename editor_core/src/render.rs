//! Boundary to the character display
//!
//! The core never drives the display itself. A host implements
//! `TextDisplay` for its display driver and calls these helpers after every
//! mutating operation with the `LineSet` the operation returned.

use core::ops::Range;

use crate::buffer::FileContent;
use crate::damage::LineSet;
use crate::index::{FileIndex, NameSlot};
use crate::limits::LINE_CAPACITY;
use crate::line::Line;

/// Rows on the target display
pub const DISPLAY_ROWS: usize = 2;

/// Shown in place of the name of an unused slot
pub const EMPTY_SLOT_LABEL: &[u8] = b"<Empty slot>";

/// A character display with row/column addressing
pub trait TextDisplay {
    /// Write `bytes` starting at `row`, `col`
    fn write_at(&mut self, row: usize, col: usize, bytes: &[u8]);

    /// Blank a whole row
    fn clear_row(&mut self, row: usize);
}

/// Which run of lines is currently on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    top: usize,
    rows: usize,
    total: usize,
}

impl Viewport {
    /// A viewport of `rows` rows over `total` lines, scrolled to the top
    pub fn new(rows: usize, total: usize) -> Self {
        Self {
            top: 0,
            rows: rows.min(total),
            total,
        }
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Line indices currently visible
    pub fn lines(&self) -> Range<usize> {
        self.top..self.top + self.rows
    }

    /// Display row showing `line`, if it is visible
    pub fn row_of(&self, line: usize) -> Option<usize> {
        self.lines().contains(&line).then(|| line - self.top)
    }

    /// Scroll the least amount needed to show `line`
    ///
    /// Returns true if the viewport moved, in which case every row needs a
    /// repaint.
    pub fn follow(&mut self, line: usize) -> bool {
        let line = line.min(self.total.saturating_sub(1));
        let old_top = self.top;
        if line < self.top {
            self.top = line;
        } else if line >= self.top + self.rows {
            self.top = line + 1 - self.rows;
        }
        self.top != old_top
    }
}

fn paint_text(display: &mut impl TextDisplay, row: usize, text: &[u8]) {
    display.clear_row(row);
    if !text.is_empty() {
        display.write_at(row, 0, text);
    }
}

pub fn paint_line(display: &mut impl TextDisplay, row: usize, line: &Line) {
    paint_text(display, row, line.as_bytes());
}

pub fn paint_slot(display: &mut impl TextDisplay, row: usize, slot: &NameSlot) {
    if slot.is_empty() {
        paint_text(display, row, EMPTY_SLOT_LABEL);
    } else {
        paint_text(display, row, slot.name());
    }
}

/// Columns taken by the index prefix: two digits and a separator
pub const INDEX_WIDTH: usize = 3;

/// Separator drawn after an index; a solid block on HD44780-style displays
pub const INDEX_SEPARATOR: u8 = 0xFF;

/// Left-aligned two-digit index followed by the separator
fn index_prefix(idx: usize) -> [u8; INDEX_WIDTH] {
    let idx = idx % 100;
    if idx < 10 {
        [b'0' + idx as u8, b' ', INDEX_SEPARATOR]
    } else {
        [b'0' + (idx / 10) as u8, b'0' + (idx % 10) as u8, INDEX_SEPARATOR]
    }
}

fn paint_indexed_text(display: &mut impl TextDisplay, row: usize, idx: usize, text: &[u8]) {
    display.clear_row(row);
    display.write_at(row, 0, &index_prefix(idx));
    let room = LINE_CAPACITY - INDEX_WIDTH;
    let shown = &text[..text.len().min(room)];
    if !shown.is_empty() {
        display.write_at(row, INDEX_WIDTH, shown);
    }
}

/// Paint line `idx` behind its index, truncated to the remaining columns
pub fn paint_line_indexed(display: &mut impl TextDisplay, row: usize, idx: usize, line: &Line) {
    paint_indexed_text(display, row, idx, line.as_bytes());
}

/// Paint slot `id` behind its index
pub fn paint_slot_indexed(display: &mut impl TextDisplay, row: usize, id: usize, slot: &NameSlot) {
    if slot.is_empty() {
        paint_indexed_text(display, row, id, EMPTY_SLOT_LABEL);
    } else {
        paint_indexed_text(display, row, id, slot.name());
    }
}

/// Paint every visible line with its index
pub fn paint_viewport_indexed(
    display: &mut impl TextDisplay,
    content: &FileContent,
    viewport: &Viewport,
) {
    for (row, idx) in viewport.lines().enumerate() {
        if let Some(line) = content.line(idx) {
            paint_line_indexed(display, row, idx, line);
        }
    }
}

/// Paint every visible slot with its index
pub fn paint_index_indexed(display: &mut impl TextDisplay, index: &FileIndex, viewport: &Viewport) {
    for (row, id) in viewport.lines().enumerate() {
        if let Some(slot) = index.slot(id) {
            paint_slot_indexed(display, row, id, slot);
        }
    }
}

/// Paint every visible line
pub fn paint_viewport(display: &mut impl TextDisplay, content: &FileContent, viewport: &Viewport) {
    for (row, idx) in viewport.lines().enumerate() {
        if let Some(line) = content.line(idx) {
            paint_line(display, row, line);
        }
    }
}

/// Paint only the visible lines in `changed`
pub fn repaint_changed(
    display: &mut impl TextDisplay,
    content: &FileContent,
    viewport: &Viewport,
    changed: LineSet,
) {
    for idx in changed.iter() {
        if let (Some(row), Some(line)) = (viewport.row_of(idx), content.line(idx)) {
            paint_line(display, row, line);
        }
    }
}

/// Paint every visible slot of the file directory
pub fn paint_index(display: &mut impl TextDisplay, index: &FileIndex, viewport: &Viewport) {
    for (row, id) in viewport.lines().enumerate() {
        if let Some(slot) = index.slot(id) {
            paint_slot(display, row, slot);
        }
    }
}
