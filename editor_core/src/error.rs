//! Editing errors

use core::fmt;

/// Reasons an edit was refused
///
/// Either way the buffer is left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    /// A line, the file, or the cascade target has no room left
    CapacityExceeded,
    /// The caller passed a cursor outside the valid range
    InvalidCursor,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded => write!(f, "capacity exceeded"),
            Self::InvalidCursor => write!(f, "cursor outside the buffer"),
        }
    }
}
