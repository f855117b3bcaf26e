//! Placement of the names and data regions in flash

use editor_core::{FILE_BYTES, FILE_SLOTS, INDEX_BYTES};
use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};

/// Flash size of the reference board
pub const DEFAULT_FLASH_SIZE: usize = 2 * 1024 * 1024;
/// Smallest erasable unit of the reference board
pub const DEFAULT_SECTOR_SIZE: usize = 4096;
/// Smallest programmable unit of the reference board
pub const DEFAULT_PAGE_SIZE: usize = 256;

fn round_up(value: usize, to: usize) -> usize {
    if to == 0 {
        value
    } else {
        value.div_ceil(to) * to
    }
}

/// Where the editor's files live in flash
///
/// The names region is one sector holding the serialized `FileIndex`. The
/// data region holds every slot's content back to back, several files per
/// sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashLayout {
    pub flash_size: usize,
    pub sector_size: usize,
    pub page_size: usize,
    pub names_offset: usize,
    pub data_offset: usize,
}

impl FlashLayout {
    /// Reserve the top of flash: data region last, names sector just below it
    pub fn top_of_flash(flash_size: usize, sector_size: usize, page_size: usize) -> Self {
        let data_len = round_up(FILE_SLOTS * FILE_BYTES, sector_size);
        let data_offset = flash_size.saturating_sub(data_len);
        Self {
            flash_size,
            sector_size,
            page_size,
            names_offset: data_offset.saturating_sub(sector_size),
            data_offset,
        }
    }

    /// Bytes reserved for names, always a whole sector
    pub fn names_len(&self) -> usize {
        self.sector_size
    }

    /// Bytes reserved for file contents, rounded up to whole sectors
    pub fn data_len(&self) -> usize {
        round_up(FILE_SLOTS * FILE_BYTES, self.sector_size)
    }

    pub fn files_per_block(&self) -> usize {
        self.sector_size / FILE_BYTES
    }

    /// Start of `slot`'s content
    pub fn content_offset(&self, slot: usize) -> usize {
        self.data_offset + slot * FILE_BYTES
    }

    /// Start of the sector containing `slot`'s content
    pub fn block_offset(&self, slot: usize) -> usize {
        self.data_offset + (slot / self.files_per_block()) * self.sector_size
    }

    /// Sectors covered by the names and data regions
    pub fn reserved_sectors(&self) -> usize {
        (self.names_len() + self.data_len()) / self.sector_size
    }

    /// Pages covered by the names and data regions
    pub fn reserved_pages(&self) -> usize {
        (self.names_len() + self.data_len()) / self.page_size
    }

    /// Check the geometry is usable
    pub fn validate(&self) -> StorageResult<()> {
        if self.page_size == 0 || self.sector_size == 0 {
            return Err(StorageError::InvalidLayout("zero page or sector size"));
        }
        if self.sector_size % self.page_size != 0 {
            return Err(StorageError::InvalidLayout(
                "page size does not divide sector size",
            ));
        }
        if self.sector_size < FILE_BYTES || self.sector_size % FILE_BYTES != 0 {
            return Err(StorageError::InvalidLayout(
                "sector does not hold a whole number of files",
            ));
        }
        if INDEX_BYTES > self.names_len() {
            return Err(StorageError::InvalidLayout("name table exceeds one sector"));
        }
        if self.names_offset % self.sector_size != 0 || self.data_offset % self.sector_size != 0 {
            return Err(StorageError::InvalidLayout("region not sector aligned"));
        }

        let names_end = self.names_offset.checked_add(self.names_len());
        let data_end = self.data_offset.checked_add(self.data_len());
        let (names_end, data_end) = match (names_end, data_end) {
            (Some(n), Some(d)) if n <= self.flash_size && d <= self.flash_size => (n, d),
            _ => return Err(StorageError::InvalidLayout("region exceeds flash size")),
        };
        if self.names_offset < data_end && self.data_offset < names_end {
            return Err(StorageError::InvalidLayout("names and data regions overlap"));
        }
        Ok(())
    }
}

impl Default for FlashLayout {
    fn default() -> Self {
        Self::top_of_flash(DEFAULT_FLASH_SIZE, DEFAULT_SECTOR_SIZE, DEFAULT_PAGE_SIZE)
    }
}
