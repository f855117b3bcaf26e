#![no_std]

//! # Editor Core
//!
//! Fixed-capacity text editing for the handheld editor.
//!
//! ## Philosophy
//!
//! - **No_std compatible**: Uses alloc only for convenience accessors, never for storage
//! - **Fixed capacity**: A file is 64 lines of 16 bytes; nothing grows or shrinks
//! - **All-or-nothing**: An edit that cannot fit leaves the buffer untouched
//! - **Mechanism over policy**: Core reports changed lines, hosts decide rendering
//!
//! ## Design
//!
//! The core provides:
//! - Line: one fixed-capacity row with single-line insert/overwrite/delete
//! - FileContent: the resident file and the cascading multi-line edits
//! - FileIndex / NameSlot: the fixed file directory
//! - LineSet / Edit: which lines an operation changed, and where the cursor went
//! - render: the boundary a character display implements

extern crate alloc;

pub mod buffer;
pub mod damage;
pub mod error;
pub mod index;
pub mod limits;
pub mod line;
pub mod mode;
pub mod render;

pub use buffer::{Cursor, FileContent, Motion};
pub use damage::{Edit, LineSet};
pub use error::EditError;
pub use index::{FileIndex, NameSlot};
pub use limits::{FILE_BYTES, FILE_SLOTS, INDEX_BYTES, LINES_PER_FILE, LINE_CAPACITY, SENTINEL};
pub use line::{Line, Span};
pub use mode::EditMode;
pub use render::{TextDisplay, Viewport};
