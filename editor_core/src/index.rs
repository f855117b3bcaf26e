//! File directory: one name slot per file

use crate::limits::{FILE_SLOTS, LINE_CAPACITY};
use crate::line::Line;

/// Name of the file stored in one slot
///
/// An empty name means the slot is unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NameSlot {
    name: Line,
}

impl NameSlot {
    pub const EMPTY: NameSlot = NameSlot { name: Line::EMPTY };

    /// Decode a slot from its stored form
    pub fn from_raw(raw: &[u8]) -> Self {
        Self {
            name: Line::from_raw(raw),
        }
    }

    /// A slot holding `name`, `None` if it is empty, too long, or contains the sentinel
    pub fn named(name: &[u8]) -> Option<Self> {
        if name.is_empty() {
            return None;
        }
        Line::from_text(name).map(|name| Self { name })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    pub fn len(&self) -> usize {
        self.name.len()
    }

    pub fn name(&self) -> &[u8] {
        self.name.as_bytes()
    }

    /// The stored form, sentinel padding included
    pub fn raw(&self) -> &[u8; LINE_CAPACITY] {
        self.name.raw()
    }

    pub fn clear(&mut self) {
        self.name.clear();
    }
}

/// The fixed table of file names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIndex {
    slots: [NameSlot; FILE_SLOTS],
}

impl FileIndex {
    /// An index with every slot unused
    pub const fn new() -> Self {
        Self {
            slots: [NameSlot::EMPTY; FILE_SLOTS],
        }
    }

    pub fn from_slots(slots: [NameSlot; FILE_SLOTS]) -> Self {
        Self { slots }
    }

    pub fn slot(&self, id: usize) -> Option<&NameSlot> {
        self.slots.get(id)
    }

    pub fn slot_mut(&mut self, id: usize) -> Option<&mut NameSlot> {
        self.slots.get_mut(id)
    }

    pub fn slots(&self) -> &[NameSlot] {
        &self.slots
    }

    /// Lowest unused slot id
    pub fn first_free(&self) -> Option<usize> {
        self.slots.iter().position(NameSlot::is_empty)
    }

    /// Number of slots holding a file
    pub fn file_count(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_empty()).count()
    }
}

impl Default for FileIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::SENTINEL;

    #[test]
    fn test_named_slot() {
        let slot = NameSlot::named(b"notes").unwrap();
        assert_eq!(slot.name(), b"notes");
        assert_eq!(slot.len(), 5);
        assert!(slot.raw()[5..].iter().all(|&b| b == SENTINEL));
    }

    #[test]
    fn test_named_rejects_bad_names() {
        assert!(NameSlot::named(b"").is_none());
        assert!(NameSlot::named(b"this name is too long").is_none());
        assert!(NameSlot::named(&[b'a', SENTINEL]).is_none());
    }

    #[test]
    fn test_slot_from_erased_flash_is_empty() {
        let slot = NameSlot::from_raw(&[SENTINEL; LINE_CAPACITY]);
        assert!(slot.is_empty());
    }

    #[test]
    fn test_index_free_slots() {
        let mut index = FileIndex::new();
        assert_eq!(index.first_free(), Some(0));
        assert_eq!(index.file_count(), 0);

        *index.slot_mut(0).unwrap() = NameSlot::named(b"a").unwrap();
        *index.slot_mut(2).unwrap() = NameSlot::named(b"c").unwrap();
        assert_eq!(index.first_free(), Some(1));
        assert_eq!(index.file_count(), 2);

        index.slot_mut(0).unwrap().clear();
        assert_eq!(index.first_free(), Some(0));
        assert!(index.slot(FILE_SLOTS).is_none());
    }
}
