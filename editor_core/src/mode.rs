//! Character entry modes

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

/// How a typed character treats the character under the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub enum EditMode {
    /// Existing characters move right to make room
    #[default]
    ShiftInsert,
    /// The character under the cursor is replaced
    Overwrite,
}

impl EditMode {
    pub fn toggle(self) -> Self {
        match self {
            EditMode::ShiftInsert => EditMode::Overwrite,
            EditMode::Overwrite => EditMode::ShiftInsert,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EditMode::ShiftInsert => "INSERT",
            EditMode::Overwrite => "OVERWRITE",
        }
    }
}
