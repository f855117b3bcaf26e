//! Session errors

use editor_core::EditError;
use services_storage::StorageError;
use thiserror::Error;

/// Errors returned to the input layer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Edit refused: {0}")]
    Edit(EditError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("No file is open")]
    NoOpenFile,

    #[error("Slot {0} holds no file")]
    EmptySlot(usize),

    #[error("Unprintable byte {0:#04x}")]
    Unprintable(u8),

    /// Byte the directory screen draws itself
    #[error("Reserved character {0:#04x}")]
    ReservedChar(u8),
}

impl From<EditError> for SessionError {
    fn from(err: EditError) -> Self {
        Self::Edit(err)
    }
}

/// Session result
pub type SessionResult<T> = Result<T, SessionError>;

/// Printable single-byte characters
pub(crate) fn is_printable(byte: u8) -> bool {
    (0x20..0x7F).contains(&byte)
}
