//! Storage errors

use hal::FlashError;
use thiserror::Error;

/// Errors from the persistence layer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The flash device refused an operation
    #[error("Flash error: {0}")]
    Flash(FlashError),

    /// Slot id is not in the directory
    #[error("Slot out of range: {0}")]
    SlotOutOfRange(usize),

    /// Slot already holds a file
    #[error("Slot in use: {0}")]
    SlotInUse(usize),

    /// Name is empty, too long, or not printable
    #[error("Invalid file name")]
    InvalidName,

    /// Region geometry does not work on this device
    #[error("Invalid layout: {0}")]
    InvalidLayout(&'static str),
}

impl From<FlashError> for StorageError {
    fn from(err: FlashError) -> Self {
        Self::Flash(err)
    }
}

/// Storage result
pub type StorageResult<T> = Result<T, StorageError>;
