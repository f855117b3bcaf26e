/// Flash device abstraction for storage
///
/// Models NOR flash as found on small microcontroller boards: reads are
/// byte-addressable, erases work on whole sectors, programming works on whole
/// pages and can only clear bits.
use core::fmt;

#[cfg(feature = "alloc")]
extern crate alloc;

/// Value of every byte after an erase
pub const ERASED_BYTE: u8 = 0xFF;

/// Flash device errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashError {
    /// Offset or length reaches past the end of the device
    OutOfBounds,
    /// Offset or length is not a multiple of the required granularity
    Misaligned,
    /// I/O error (hardware failure, timeout, etc.)
    IoError,
}

impl fmt::Display for FlashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "flash range out of bounds"),
            Self::Misaligned => write!(f, "flash range misaligned"),
            Self::IoError => write!(f, "flash I/O error"),
        }
    }
}

/// Flash device trait
///
/// Implementers provide raw access to the whole flash address space.
/// Callers are responsible for the read-modify-erase-program cycle whenever
/// they need to change less than a sector.
pub trait FlashDevice {
    /// Total size of the device in bytes
    fn capacity(&self) -> usize;

    /// Erase granularity in bytes
    fn sector_size(&self) -> usize;

    /// Program granularity in bytes
    fn page_size(&self) -> usize;

    /// Read `buffer.len()` bytes starting at `offset`
    ///
    /// # Errors
    /// Returns `FlashError::OutOfBounds` if the range leaves the device
    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), FlashError>;

    /// Erase `len` bytes starting at `offset`, setting them to `ERASED_BYTE`
    ///
    /// # Errors
    /// Returns `FlashError::Misaligned` unless both `offset` and `len` are
    /// multiples of `sector_size()`
    /// Returns `FlashError::OutOfBounds` if the range leaves the device
    fn erase(&mut self, offset: usize, len: usize) -> Result<(), FlashError>;

    /// Program `data` starting at `offset`
    ///
    /// Programming can only clear bits, so the target range should have been
    /// erased first.
    ///
    /// # Errors
    /// Returns `FlashError::Misaligned` unless both `offset` and `data.len()`
    /// are multiples of `page_size()`
    /// Returns `FlashError::OutOfBounds` if the range leaves the device
    fn program(&mut self, offset: usize, data: &[u8]) -> Result<(), FlashError>;
}

/// Checks that `offset..offset + len` is inside `capacity` and aligned to `granularity`
pub fn check_range(
    capacity: usize,
    granularity: usize,
    offset: usize,
    len: usize,
) -> Result<(), FlashError> {
    let end = offset.checked_add(len).ok_or(FlashError::OutOfBounds)?;
    if end > capacity {
        return Err(FlashError::OutOfBounds);
    }
    if granularity == 0 || offset % granularity != 0 || len % granularity != 0 {
        return Err(FlashError::Misaligned);
    }
    Ok(())
}

/// RAM flash - an in-memory NOR flash device
///
/// Starts fully erased. Useful for tests and for running the editor on a host.
#[cfg(feature = "alloc")]
pub struct RamFlash {
    bytes: alloc::vec::Vec<u8>,
    sector_size: usize,
    page_size: usize,
    erase_count: usize,
    program_count: usize,
}

#[cfg(feature = "alloc")]
impl RamFlash {
    /// Create an erased device of `capacity` bytes
    pub fn new(capacity: usize, sector_size: usize, page_size: usize) -> Self {
        Self {
            bytes: alloc::vec![ERASED_BYTE; capacity],
            sector_size,
            page_size,
            erase_count: 0,
            program_count: 0,
        }
    }

    /// Create a device with 4 KiB sectors and 256-byte pages
    pub fn with_capacity_kb(kb: usize) -> Self {
        Self::new(kb * 1024, 4096, 256)
    }

    /// Raw view of the whole device
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of successful erase calls
    pub fn erase_count(&self) -> usize {
        self.erase_count
    }

    /// Number of successful program calls
    pub fn program_count(&self) -> usize {
        self.program_count
    }
}

#[cfg(feature = "alloc")]
impl FlashDevice for RamFlash {
    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn sector_size(&self) -> usize {
        self.sector_size
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), FlashError> {
        check_range(self.bytes.len(), 1, offset, buffer.len())?;
        buffer.copy_from_slice(&self.bytes[offset..offset + buffer.len()]);
        Ok(())
    }

    fn erase(&mut self, offset: usize, len: usize) -> Result<(), FlashError> {
        check_range(self.bytes.len(), self.sector_size, offset, len)?;
        self.bytes[offset..offset + len].fill(ERASED_BYTE);
        self.erase_count += 1;
        Ok(())
    }

    fn program(&mut self, offset: usize, data: &[u8]) -> Result<(), FlashError> {
        check_range(self.bytes.len(), self.page_size, offset, data.len())?;
        for (cell, byte) in self.bytes[offset..offset + data.len()].iter_mut().zip(data) {
            *cell &= *byte;
        }
        self.program_count += 1;
        Ok(())
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    extern crate std;

    #[test]
    fn test_ramflash_starts_erased() {
        let flash = RamFlash::with_capacity_kb(8);
        assert_eq!(flash.capacity(), 8192);
        assert_eq!(flash.sector_size(), 4096);
        assert_eq!(flash.page_size(), 256);
        assert!(flash.as_bytes().iter().all(|&b| b == ERASED_BYTE));
    }

    #[test]
    fn test_ramflash_program_and_read() {
        let mut flash = RamFlash::with_capacity_kb(8);
        let data = [0x42u8; 256];
        flash.program(256, &data).unwrap();

        let mut read = [0u8; 256];
        flash.read(256, &mut read).unwrap();
        assert_eq!(read, data);

        // Neighbouring page untouched
        flash.read(0, &mut read).unwrap();
        assert_eq!(read, [ERASED_BYTE; 256]);
    }

    #[test]
    fn test_ramflash_program_only_clears_bits() {
        let mut flash = RamFlash::with_capacity_kb(4);
        flash.program(0, &[0xF0u8; 256]).unwrap();
        flash.program(0, &[0x3Cu8; 256]).unwrap();

        let mut read = [0u8; 1];
        flash.read(0, &mut read).unwrap();
        assert_eq!(read[0], 0x30);
    }

    #[test]
    fn test_ramflash_erase_restores_sentinel() {
        let mut flash = RamFlash::with_capacity_kb(8);
        flash.program(4096, &[0u8; 256]).unwrap();
        flash.erase(4096, 4096).unwrap();

        let mut read = [0u8; 256];
        flash.read(4096, &mut read).unwrap();
        assert_eq!(read, [ERASED_BYTE; 256]);
        assert_eq!(flash.erase_count(), 1);
        assert_eq!(flash.program_count(), 1);
    }

    #[test]
    fn test_ramflash_alignment() {
        let mut flash = RamFlash::with_capacity_kb(8);
        assert_eq!(flash.erase(256, 4096), Err(FlashError::Misaligned));
        assert_eq!(flash.erase(0, 256), Err(FlashError::Misaligned));
        assert_eq!(flash.program(16, &[0u8; 256]), Err(FlashError::Misaligned));
        assert_eq!(flash.program(0, &[0u8; 16]), Err(FlashError::Misaligned));

        // Reads have byte granularity
        let mut read = [0u8; 3];
        assert!(flash.read(17, &mut read).is_ok());
    }

    #[test]
    fn test_ramflash_out_of_bounds() {
        let mut flash = RamFlash::with_capacity_kb(8);
        let mut read = [0u8; 16];
        assert_eq!(flash.read(8190, &mut read), Err(FlashError::OutOfBounds));
        assert_eq!(flash.erase(8192, 4096), Err(FlashError::OutOfBounds));
        assert_eq!(flash.program(8192, &[0u8; 256]), Err(FlashError::OutOfBounds));
        assert_eq!(flash.read(usize::MAX, &mut read), Err(FlashError::OutOfBounds));
    }
}
