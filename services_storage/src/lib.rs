//! # Storage Service
//!
//! This crate persists the file directory and file contents in raw flash.
//!
//! ## Philosophy
//!
//! **The erased state of flash is the empty state of a file.**
//!
//! Nothing is stored but the bytes themselves:
//! - A byte of 0xFF means "no data", exactly what an erase leaves behind
//! - Lengths are never written; they are recovered by scanning for the first 0xFF
//! - A freshly erased region decodes as an index of empty slots and empty files
//!
//! ## Design
//!
//! - **FlashLayout**: where the names and data regions live, and their granularity
//! - **codec**: sentinel encoding between fixed regions and in-memory structures
//! - **FlashPersistence**: load, save, create, rename, delete, erase-all
//! - **FailingFlash**: failure injection for tests
//!
//! ## Limitations
//!
//! There is no wear-leveling and no power-loss protection. A power cut between
//! an erase and the following program leaves that sector undefined.

pub mod codec;
pub mod error;
pub mod failing_device;
pub mod layout;
pub mod persistence;

pub use codec::{decode_content, decode_index, encode_content, encode_index};
pub use error::{StorageError, StorageResult};
pub use failing_device::{FailingFlash, FailurePolicy};
pub use layout::FlashLayout;
pub use persistence::FlashPersistence;
