//! Committing the index and file contents to flash
//!
//! Flash can only be erased a whole sector at a time, so every write here is
//! a read-modify-erase-program cycle over the sector that holds the target.
//! Each erase/program pair runs with interrupts disabled; nothing else can
//! touch flash while it is in progress.

use editor_core::{FileContent, FileIndex, NameSlot, FILE_BYTES, FILE_SLOTS, INDEX_BYTES, SENTINEL};
use hal::{without_interrupts, FlashDevice, FlashError, InterruptControl};

use crate::codec::{decode_content, decode_index, encode_content, encode_index};
use crate::error::{StorageError, StorageResult};
use crate::layout::FlashLayout;

fn is_printable(byte: u8) -> bool {
    (0x20..0x7F).contains(&byte)
}

/// Flash-backed storage for the file directory and file contents
pub struct FlashPersistence<F: FlashDevice, I: InterruptControl> {
    flash: F,
    irq: I,
    layout: FlashLayout,
}

impl<F: FlashDevice, I: InterruptControl> FlashPersistence<F, I> {
    /// Wrap a device, checking that `layout` fits it
    pub fn new(flash: F, irq: I, layout: FlashLayout) -> StorageResult<Self> {
        layout.validate()?;
        if flash.sector_size() != layout.sector_size || flash.page_size() != layout.page_size {
            return Err(StorageError::InvalidLayout(
                "layout granularity does not match device",
            ));
        }
        if flash.capacity() < layout.flash_size {
            return Err(StorageError::InvalidLayout("layout larger than device"));
        }
        Ok(Self { flash, irq, layout })
    }

    pub fn layout(&self) -> &FlashLayout {
        &self.layout
    }

    pub fn flash(&self) -> &F {
        &self.flash
    }

    pub fn flash_mut(&mut self) -> &mut F {
        &mut self.flash
    }

    pub fn interrupts(&self) -> &I {
        &self.irq
    }

    pub fn into_inner(self) -> (F, I) {
        (self.flash, self.irq)
    }

    fn check_slot(slot: usize) -> StorageResult<()> {
        if slot < FILE_SLOTS {
            Ok(())
        } else {
            Err(StorageError::SlotOutOfRange(slot))
        }
    }

    /// Read the name table
    pub fn load_index(&mut self) -> StorageResult<FileIndex> {
        let mut raw = [0u8; INDEX_BYTES];
        self.flash.read(self.layout.names_offset, &mut raw)?;
        Ok(decode_index(&raw))
    }

    /// Read one slot's content
    pub fn load_content(&mut self, slot: usize) -> StorageResult<FileContent> {
        Self::check_slot(slot)?;
        let mut raw = [0u8; FILE_BYTES];
        self.flash.read(self.layout.content_offset(slot), &mut raw)?;
        Ok(decode_content(&raw))
    }

    /// Rewrite the whole names sector
    pub fn save_index(&mut self, index: &FileIndex) -> StorageResult<()> {
        let mut sector = vec![SENTINEL; self.layout.names_len()];
        sector[..INDEX_BYTES].copy_from_slice(&encode_index(index));
        self.erase_and_program(self.layout.names_offset, &sector)
    }

    /// Rewrite one slot's content, preserving the other files sharing its sector
    pub fn save_content(&mut self, content: &FileContent, slot: usize) -> StorageResult<()> {
        Self::check_slot(slot)?;
        let block = self.layout.block_offset(slot);
        let start = self.layout.content_offset(slot) - block;

        let mut sector = vec![0u8; self.layout.sector_size];
        self.flash.read(block, &mut sector)?;
        sector[start..start + FILE_BYTES].copy_from_slice(&encode_content(content));
        self.erase_and_program(block, &sector)
    }

    /// Name an unused slot and commit the index
    pub fn create_file(
        &mut self,
        index: &mut FileIndex,
        slot: usize,
        name: &[u8],
    ) -> StorageResult<()> {
        Self::check_slot(slot)?;
        if index.slot(slot).is_some_and(|entry| !entry.is_empty()) {
            return Err(StorageError::SlotInUse(slot));
        }
        self.write_name(index, slot, name)?;
        log::info!("created file in slot {}", slot);
        Ok(())
    }

    /// Change a slot's name and commit the index
    pub fn rename_file(
        &mut self,
        index: &mut FileIndex,
        slot: usize,
        name: &[u8],
    ) -> StorageResult<()> {
        self.write_name(index, slot, name)?;
        log::info!("renamed file in slot {}", slot);
        Ok(())
    }

    fn write_name(&mut self, index: &mut FileIndex, slot: usize, name: &[u8]) -> StorageResult<()> {
        Self::check_slot(slot)?;
        if !name.iter().copied().all(is_printable) {
            return Err(StorageError::InvalidName);
        }
        let named = NameSlot::named(name).ok_or(StorageError::InvalidName)?;
        if let Some(entry) = index.slot_mut(slot) {
            *entry = named;
        }
        self.save_index(index)
    }

    /// Free a slot and wipe its content
    ///
    /// The content written is a fresh empty file, never whatever happens to
    /// be resident.
    pub fn delete_file(&mut self, index: &mut FileIndex, slot: usize) -> StorageResult<()> {
        Self::check_slot(slot)?;
        if let Some(entry) = index.slot_mut(slot) {
            entry.clear();
        }
        self.save_index(index)?;
        self.save_content(&FileContent::new(), slot)?;
        log::info!("deleted file in slot {}", slot);
        Ok(())
    }

    /// Return both regions to the erased, no-files state
    pub fn erase_all(&mut self) -> StorageResult<()> {
        let blank = vec![SENTINEL; self.layout.page_size];
        let regions = [
            (self.layout.names_offset, self.layout.names_len()),
            (self.layout.data_offset, self.layout.data_len()),
        ];

        for (region_start, region_len) in regions {
            for sector in (region_start..region_start + region_len).step_by(self.layout.sector_size) {
                let sector_size = self.layout.sector_size;
                let page_size = self.layout.page_size;
                let flash = &mut self.flash;
                without_interrupts(&mut self.irq, || -> Result<(), FlashError> {
                    flash.erase(sector, sector_size)?;
                    for page in (sector..sector + sector_size).step_by(page_size) {
                        flash.program(page, &blank)?;
                    }
                    Ok(())
                })
                .map_err(|err| {
                    log::warn!("erase-all failed at {:#x}: {}", sector, err);
                    StorageError::from(err)
                })?;
            }
        }

        log::info!("erased {} pages", self.layout.reserved_pages());
        Ok(())
    }

    fn erase_and_program(&mut self, offset: usize, data: &[u8]) -> StorageResult<()> {
        log::debug!("rewriting {} bytes at {:#x}", data.len(), offset);
        let flash = &mut self.flash;
        without_interrupts(&mut self.irq, || -> Result<(), FlashError> {
            flash.erase(offset, data.len())?;
            flash.program(offset, data)
        })
        .map_err(|err| {
            log::warn!("flash rewrite at {:#x} failed: {}", offset, err);
            StorageError::from(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use editor_core::{Cursor, EditMode, LINE_CAPACITY};
    use hal::{HostInterrupts, RamFlash};

    fn small_layout() -> FlashLayout {
        FlashLayout::top_of_flash(128 * 1024, 4096, 256)
    }

    fn storage() -> FlashPersistence<RamFlash, HostInterrupts> {
        FlashPersistence::new(
            RamFlash::with_capacity_kb(128),
            HostInterrupts::new(),
            small_layout(),
        )
        .unwrap()
    }

    fn sample_content() -> FileContent {
        let lines: [&[u8]; 3] = [b"first line", b"0123456789abcdef", b"x"];
        FileContent::from_text_lines(&lines).unwrap()
    }

    #[test]
    fn test_new_rejects_mismatched_device() {
        let result = FlashPersistence::new(
            RamFlash::new(128 * 1024, 8192, 256),
            HostInterrupts::new(),
            small_layout(),
        );
        assert!(matches!(result, Err(StorageError::InvalidLayout(_))));

        let result = FlashPersistence::new(
            RamFlash::with_capacity_kb(64),
            HostInterrupts::new(),
            small_layout(),
        );
        assert!(matches!(result, Err(StorageError::InvalidLayout(_))));
    }

    #[test]
    fn test_erased_flash_has_no_files() {
        let mut storage = storage();
        let index = storage.load_index().unwrap();
        assert_eq!(index.file_count(), 0);
        assert_eq!(storage.load_content(7).unwrap(), FileContent::new());
    }

    #[test]
    fn test_content_round_trip() {
        let mut storage = storage();
        let content = sample_content();
        storage.save_content(&content, 2).unwrap();
        assert_eq!(storage.load_content(2).unwrap(), content);

        let reloaded = storage.load_content(2).unwrap();
        storage.save_content(&reloaded, 2).unwrap();
        assert_eq!(storage.load_content(2).unwrap(), content);
    }

    #[test]
    fn test_save_content_preserves_sector_neighbours() {
        let mut storage = storage();
        let mut other = FileContent::new();
        other.add_char(Cursor::zero(), b'n', EditMode::ShiftInsert).unwrap();

        // Slots 4..8 share a sector
        storage.save_content(&other, 4).unwrap();
        storage.save_content(&other, 7).unwrap();
        storage.save_content(&sample_content(), 5).unwrap();

        assert_eq!(storage.load_content(4).unwrap(), other);
        assert_eq!(storage.load_content(5).unwrap(), sample_content());
        assert_eq!(storage.load_content(6).unwrap(), FileContent::new());
        assert_eq!(storage.load_content(7).unwrap(), other);
    }

    #[test]
    fn test_save_content_writes_one_sector() {
        let mut storage = storage();
        storage.save_content(&sample_content(), 9).unwrap();
        assert_eq!(storage.flash().erase_count(), 1);
        assert_eq!(storage.flash().program_count(), 1);
        assert_eq!(storage.interrupts().critical_sections(), 1);
        assert!(storage.interrupts().interrupts_enabled());
    }

    #[test]
    fn test_create_file_commits_index() {
        let mut storage = storage();
        let mut index = storage.load_index().unwrap();
        storage.create_file(&mut index, 3, b"notes").unwrap();

        assert_eq!(index.slot(3).unwrap().name(), b"notes");
        let reloaded = storage.load_index().unwrap();
        assert_eq!(reloaded, index);
    }

    #[test]
    fn test_rename_file() {
        let mut storage = storage();
        let mut index = FileIndex::new();
        storage.create_file(&mut index, 0, b"a much longer nm").unwrap();
        storage.rename_file(&mut index, 0, b"short").unwrap();

        let slot = *storage.load_index().unwrap().slot(0).unwrap();
        assert_eq!(slot.name(), b"short");
        assert!(slot.raw()[5..].iter().all(|&b| b == SENTINEL));
    }

    #[test]
    fn test_create_on_used_slot_rejected() {
        let mut storage = storage();
        let mut index = FileIndex::new();
        storage.create_file(&mut index, 3, b"private").unwrap();
        storage.save_content(&sample_content(), 3).unwrap();
        let erases = storage.flash().erase_count();

        assert_eq!(
            storage.create_file(&mut index, 3, b"new"),
            Err(StorageError::SlotInUse(3))
        );
        assert_eq!(index.slot(3).unwrap().name(), b"private");
        assert_eq!(storage.load_index().unwrap(), index);
        assert_eq!(storage.flash().erase_count(), erases);
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut storage = storage();
        let mut index = FileIndex::new();
        assert_eq!(
            storage.create_file(&mut index, 0, b""),
            Err(StorageError::InvalidName)
        );
        assert_eq!(
            storage.create_file(&mut index, 0, &[b'a'; LINE_CAPACITY + 1]),
            Err(StorageError::InvalidName)
        );
        assert_eq!(
            storage.create_file(&mut index, 0, b"tab\there"),
            Err(StorageError::InvalidName)
        );
        assert_eq!(index, FileIndex::new());
        assert_eq!(storage.flash().erase_count(), 0);
    }

    #[test]
    fn test_slot_out_of_range() {
        let mut storage = storage();
        let mut index = FileIndex::new();
        assert_eq!(
            storage.load_content(FILE_SLOTS),
            Err(StorageError::SlotOutOfRange(FILE_SLOTS))
        );
        assert_eq!(
            storage.save_content(&FileContent::new(), 99),
            Err(StorageError::SlotOutOfRange(99))
        );
        assert_eq!(
            storage.delete_file(&mut index, FILE_SLOTS),
            Err(StorageError::SlotOutOfRange(FILE_SLOTS))
        );
    }

    #[test]
    fn test_delete_file_clears_name_and_content() {
        let mut storage = storage();
        let mut index = FileIndex::new();
        storage.create_file(&mut index, 5, b"doomed").unwrap();
        storage.save_content(&sample_content(), 5).unwrap();

        storage.delete_file(&mut index, 5).unwrap();

        let reloaded = storage.load_index().unwrap();
        assert!(reloaded.slot(5).unwrap().is_empty());
        let start = storage.layout().content_offset(5);
        let region = &storage.flash().as_bytes()[start..start + FILE_BYTES];
        assert!(region.iter().all(|&b| b == SENTINEL));
    }

    #[test]
    fn test_erase_all() {
        let mut storage = storage();
        let mut index = FileIndex::new();
        storage.create_file(&mut index, 0, b"one").unwrap();
        storage.save_content(&sample_content(), 0).unwrap();
        storage.save_content(&sample_content(), 63).unwrap();

        storage.erase_all().unwrap();

        let layout = *storage.layout();
        let bytes = storage.flash().as_bytes();
        assert!(bytes[layout.names_offset..layout.flash_size]
            .iter()
            .all(|&b| b == SENTINEL));
        assert_eq!(storage.load_index().unwrap(), FileIndex::new());
        assert_eq!(
            storage.interrupts().critical_sections(),
            3 + layout.reserved_sectors()
        );
    }
}
