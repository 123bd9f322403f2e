use crate::address::{FrameNumber, PhysAddr};
use alloc::boxed::Box;
use core::sync::atomic::{AtomicU8, Ordering};
use simos_info::memory::PAGE_SIZE;

/// The simulated physical memory.
///
/// Every byte is an atomic so any number of threads can access RAM without
/// a lock; which bytes a process may touch is decided by translation, not
/// here.
pub struct PhysicalRam {
    bytes: Box<[AtomicU8]>,
}

impl PhysicalRam {
    /// Creates `size` zeroed bytes of RAM.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            bytes: (0..size).map(|_| AtomicU8::new(0)).collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `None` if `pa` lies outside of RAM.
    #[inline]
    #[must_use]
    pub fn read(&self, pa: PhysAddr) -> Option<u8> {
        self.bytes
            .get(pa.as_usize())
            .map(|b| b.load(Ordering::Relaxed))
    }

    /// Returns `false` if `pa` lies outside of RAM.
    #[inline]
    pub fn write(&self, pa: PhysAddr, value: u8) -> bool {
        let Some(b) = self.bytes.get(pa.as_usize()) else {
            return false;
        };
        b.store(value, Ordering::Relaxed);
        true
    }

    /// The bytes of one frame together with their physical addresses.
    pub fn frame_bytes(&self, frame: FrameNumber) -> impl Iterator<Item = (PhysAddr, u8)> + '_ {
        let start = frame.base().as_usize();
        let end = (start + PAGE_SIZE as usize).min(self.bytes.len());
        let start = start.min(end);
        self.bytes[start..end]
            .iter()
            .zip(frame.base().as_u32()..)
            .map(|(b, pa)| (PhysAddr::new(pa), b.load(Ordering::Relaxed)))
    }
}

impl core::fmt::Debug for PhysicalRam {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PhysicalRam")
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn starts_zeroed_and_stores_bytes() {
        let ram = PhysicalRam::new(2 * PAGE_SIZE as usize);
        assert_eq!(ram.read(PhysAddr::new(5)), Some(0));
        assert!(ram.write(PhysAddr::new(5), 0xAB));
        assert_eq!(ram.read(PhysAddr::new(5)), Some(0xAB));
    }

    #[test]
    fn out_of_range_access_is_refused() {
        let ram = PhysicalRam::new(PAGE_SIZE as usize);
        assert_eq!(ram.read(PhysAddr::new(PAGE_SIZE)), None);
        assert!(!ram.write(PhysAddr::new(PAGE_SIZE), 1));
    }

    #[test]
    fn frame_bytes_cover_exactly_one_frame() {
        let ram = PhysicalRam::new(2 * PAGE_SIZE as usize);
        let frame = FrameNumber::new(1);
        ram.write(frame.with_offset(3), 7);
        let bytes: Vec<_> = ram.frame_bytes(frame).collect();
        assert_eq!(bytes.len(), PAGE_SIZE as usize);
        assert_eq!(bytes[0].0, frame.base());
        assert_eq!(bytes[3], (frame.with_offset(3), 7));
    }
}
