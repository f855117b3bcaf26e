//! # Editor Session Service
//!
//! This crate is the single entry point the input layer drives.
//!
//! ## Philosophy
//!
//! - **One session value**: the file directory, the open file, the cursor and
//!   the edit mode live in one owned `EditorSession`, never in globals
//! - **Edits are volatile**: content changes stay in memory until `save_file`
//! - **Names are durable**: create, rename and delete commit immediately
//! - **Redraw is reported**: every editing call returns the lines to repaint
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A display driver or keyboard decoder
//! - A menu system; screen state belongs to the caller
//! - Undo/redo
//!
//! ## Design
//!
//! - `EditorSession` wraps `FlashPersistence` and the resident `FileIndex`
//! - `OpenFile` is the one resident `FileContent` with its cursor
//! - `NameEntry` is the single-line prompt used to name or rename a file

pub mod error;
pub mod name_entry;
pub mod session;

pub use error::{SessionError, SessionResult};
pub use name_entry::NameEntry;
pub use session::{EditorSession, OpenFile};
