//! Sentinel encoding of the index and of file contents
//!
//! Both are stored as fixed 16-byte chunks with 0xFF padding. No length is
//! ever written: decoding recovers it from the first 0xFF in each chunk.

use editor_core::{
    FileContent, FileIndex, Line, NameSlot, FILE_BYTES, FILE_SLOTS, INDEX_BYTES, LINES_PER_FILE,
    LINE_CAPACITY, SENTINEL,
};

/// Decode a name table; missing trailing bytes read as erased
pub fn decode_index(raw: &[u8]) -> FileIndex {
    let mut slots = [NameSlot::EMPTY; FILE_SLOTS];
    for (slot, chunk) in slots.iter_mut().zip(raw.chunks(LINE_CAPACITY)) {
        *slot = NameSlot::from_raw(chunk);
    }
    FileIndex::from_slots(slots)
}

pub fn encode_index(index: &FileIndex) -> [u8; INDEX_BYTES] {
    let mut raw = [SENTINEL; INDEX_BYTES];
    for (chunk, slot) in raw.chunks_mut(LINE_CAPACITY).zip(index.slots()) {
        chunk.copy_from_slice(slot.raw());
    }
    raw
}

/// Decode one file's region; missing trailing bytes read as erased
pub fn decode_content(raw: &[u8]) -> FileContent {
    let mut lines = [Line::EMPTY; LINES_PER_FILE];
    for (line, chunk) in lines.iter_mut().zip(raw.chunks(LINE_CAPACITY)) {
        *line = Line::from_raw(chunk);
    }
    FileContent::from_lines(lines)
}

pub fn encode_content(content: &FileContent) -> [u8; FILE_BYTES] {
    let mut raw = [SENTINEL; FILE_BYTES];
    for (chunk, line) in raw.chunks_mut(LINE_CAPACITY).zip(content.lines()) {
        chunk.copy_from_slice(line.raw());
    }
    raw
}
