//! # Failing Flash Device
//!
//! A FlashDevice wrapper that can simulate erase and program failures for
//! testing how the persistence layer reports them.

use hal::{FlashDevice, FlashError};

/// Policy for when failures should occur
#[derive(Debug, Clone)]
pub enum FailurePolicy {
    /// Never fail (passthrough)
    Never,
    /// Fail every program after N successful ones
    AfterPrograms(usize),
    /// Fail erases and programs touching any of these sector indices
    OnSectors(Vec<usize>),
    /// Fail every erase after N successful ones
    AfterErases(usize),
}

/// Wrapper around a FlashDevice that can simulate failures
pub struct FailingFlash<F: FlashDevice> {
    inner: F,
    policy: FailurePolicy,
    program_count: usize,
    erase_count: usize,
}

impl<F: FlashDevice> FailingFlash<F> {
    pub fn new(inner: F, policy: FailurePolicy) -> Self {
        Self {
            inner,
            policy,
            program_count: 0,
            erase_count: 0,
        }
    }

    fn touches_failing_sector(&self, offset: usize, len: usize) -> bool {
        let FailurePolicy::OnSectors(sectors) = &self.policy else {
            return false;
        };
        let sector_size = self.inner.sector_size();
        let first = offset / sector_size;
        let last = (offset + len.max(1) - 1) / sector_size;
        sectors.iter().any(|s| (first..=last).contains(s))
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut F {
        &mut self.inner
    }

    /// Successful programs so far
    pub fn program_count(&self) -> usize {
        self.program_count
    }

    /// Successful erases so far
    pub fn erase_count(&self) -> usize {
        self.erase_count
    }

    /// Reset the failure policy
    pub fn set_policy(&mut self, policy: FailurePolicy) {
        self.policy = policy;
        self.program_count = 0;
        self.erase_count = 0;
    }
}

impl<F: FlashDevice> FlashDevice for FailingFlash<F> {
    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn sector_size(&self) -> usize {
        self.inner.sector_size()
    }

    fn page_size(&self) -> usize {
        self.inner.page_size()
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), FlashError> {
        self.inner.read(offset, buffer)
    }

    fn erase(&mut self, offset: usize, len: usize) -> Result<(), FlashError> {
        let fail = match self.policy {
            FailurePolicy::AfterErases(n) => self.erase_count >= n,
            _ => self.touches_failing_sector(offset, len),
        };
        if fail {
            return Err(FlashError::IoError);
        }
        self.inner.erase(offset, len)?;
        self.erase_count += 1;
        Ok(())
    }

    fn program(&mut self, offset: usize, data: &[u8]) -> Result<(), FlashError> {
        let fail = match self.policy {
            FailurePolicy::AfterPrograms(n) => self.program_count >= n,
            _ => self.touches_failing_sector(offset, data.len()),
        };
        if fail {
            return Err(FlashError::IoError);
        }
        self.inner.program(offset, data)?;
        self.program_count += 1;
        Ok(())
    }
}
