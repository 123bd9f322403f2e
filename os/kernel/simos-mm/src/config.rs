use crate::error::MemoryConfigError;
use simos_info::memory::{PAGE_SIZE, RAM_SIZE};

/// Runtime sizing of the simulated physical memory.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MemoryConfig {
    ram_size: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { ram_size: RAM_SIZE }
    }
}

impl MemoryConfig {
    /// A configuration with `ram_size` bytes of RAM.
    ///
    /// # Errors
    /// The size must be a nonzero multiple of the page size, and every byte
    /// must be addressable by a 32-bit physical address.
    pub fn new(ram_size: usize) -> Result<Self, MemoryConfigError> {
        if ram_size == 0 {
            return Err(MemoryConfigError::ZeroSize);
        }
        if !ram_size.is_multiple_of(PAGE_SIZE as usize) {
            return Err(MemoryConfigError::Unaligned(ram_size));
        }
        if u32::try_from(ram_size - 1).is_err() {
            return Err(MemoryConfigError::TooLarge(ram_size));
        }
        Ok(Self { ram_size })
    }

    /// A configuration with exactly `frames` physical frames.
    ///
    /// # Errors
    /// See [`MemoryConfig::new`].
    pub fn with_frames(frames: usize) -> Result<Self, MemoryConfigError> {
        let size = frames
            .checked_mul(PAGE_SIZE as usize)
            .ok_or(MemoryConfigError::TooLarge(usize::MAX))?;
        Self::new(size)
    }

    #[inline]
    #[must_use]
    pub const fn ram_size(&self) -> usize {
        self.ram_size
    }

    #[inline]
    #[must_use]
    pub const fn frames(&self) -> usize {
        self.ram_size / PAGE_SIZE as usize
    }
}
