//! Fixed geometry shared by the editor and the storage layout

/// Bytes per line, and per file name
pub const LINE_CAPACITY: usize = 16;

/// Lines per file
pub const LINES_PER_FILE: usize = 64;

/// Number of file slots in the directory
pub const FILE_SLOTS: usize = 64;

/// Bytes of content per file
pub const FILE_BYTES: usize = LINES_PER_FILE * LINE_CAPACITY;

/// Bytes of the serialized name table
pub const INDEX_BYTES: usize = FILE_SLOTS * LINE_CAPACITY;

/// "No data" marker, equal to the erased state of flash
pub const SENTINEL: u8 = 0xFF;

// LineSet is a u64 bitmap
const _: () = assert!(LINES_PER_FILE <= 64);
