//! Change reporting for redraw

use crate::buffer::Cursor;
use crate::limits::LINES_PER_FILE;

/// Set of line indices, one bit per line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LineSet(u64);

impl LineSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn single(line: usize) -> Self {
        let mut set = Self::empty();
        set.insert(line);
        set
    }

    /// All lines in `start..end`
    pub fn range(start: usize, end: usize) -> Self {
        let mut set = Self::empty();
        for line in start..end.min(LINES_PER_FILE) {
            set.insert(line);
        }
        set
    }

    pub fn insert(&mut self, line: usize) {
        if line < LINES_PER_FILE {
            self.0 |= 1 << line;
        }
    }

    pub fn contains(&self, line: usize) -> bool {
        line < LINES_PER_FILE && self.0 & (1 << line) != 0
    }

    pub fn union(self, other: LineSet) -> Self {
        Self(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Line indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..LINES_PER_FILE).filter(move |&line| self.contains(line))
    }
}

/// Result of a successful buffer operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    /// Where the cursor ended up
    pub cursor: Cursor,
    /// Lines whose visible content changed
    pub changed: LineSet,
}

impl Edit {
    pub fn new(cursor: Cursor, changed: LineSet) -> Self {
        Self { cursor, changed }
    }

    /// A cursor move that changed no text
    pub fn moved(cursor: Cursor) -> Self {
        Self::new(cursor, LineSet::empty())
    }
}
