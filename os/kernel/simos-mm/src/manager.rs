//! # Memory Manager
//!
//! [`MemoryManager`] owns the simulated RAM and the frame table, and serves
//! the allocate, release, read and write requests of simulated processes.
//!
//! ## Locking
//!
//! - The frame table sits behind a [`SpinLock`]. Allocation and release hold
//!   it for their whole duration, so frame selection is serialized across all
//!   processes.
//! - Each process's [`AddressSpace`] sits behind a [`RwSpinLock`] owned by the
//!   process. Allocation and release take it for writing (after the frame
//!   table lock, never before). Byte accesses take it for reading only and
//!   never touch the frame table lock.
//! - RAM bytes are atomics and need no lock.
//!
//! [`SpinLock`]: simos_sync::SpinLock
//! [`RwSpinLock`]: simos_sync::RwSpinLock

use crate::address::{FrameNumber, PhysAddr, VirtAddr};
use crate::config::MemoryConfig;
use crate::dump::FrameDump;
use crate::error::{AccessError, AllocError, ReleaseError};
use crate::frame_table::{FrameInfo, FrameTable};
use crate::ram::PhysicalRam;
use crate::MemoryOwner;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use log::{debug, trace, warn};
use simos_info::memory::PAGE_SIZE;
use simos_info::Pid;
use simos_sync::SpinLock;

#[derive(Debug)]
pub struct MemoryManager {
    frames: SpinLock<FrameTable>,
    ram: PhysicalRam,
    config: MemoryConfig,
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}

impl MemoryManager {
    /// Zeroed RAM with every frame free.
    #[must_use]
    pub fn new(config: MemoryConfig) -> Self {
        debug!(
            "memory: {} bytes of RAM in {} frames of {PAGE_SIZE} bytes",
            config.ram_size(),
            config.frames()
        );
        Self {
            frames: SpinLock::new(FrameTable::new(config.frames())),
            ram: PhysicalRam::new(config.ram_size()),
            config,
        }
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Allocates `size` bytes for `owner` and returns the base address of the
    /// new region.
    ///
    /// The region is rounded up to whole pages and placed at the owner's
    /// break pointer. Its frames need not be contiguous; they are picked
    /// first-fit in increasing frame order.
    ///
    /// # Errors
    /// - [`AllocError::ZeroSize`] for `size == 0`.
    /// - [`AllocError::OutOfFrames`] if fewer free frames than pages remain.
    /// - [`AllocError::AddressSpaceExhausted`] if the region would end beyond
    ///   the virtual address space.
    ///
    /// Nothing is changed on error.
    pub fn allocate<O>(&self, size: u32, owner: &O) -> Result<VirtAddr, AllocError>
    where
        O: MemoryOwner + ?Sized,
    {
        let pid = owner.pid();
        if size == 0 {
            warn!("pid {pid}: refusing to allocate zero bytes");
            return Err(AllocError::ZeroSize);
        }
        let pages = size.div_ceil(PAGE_SIZE);
        let requested = pages as usize;

        let mut frames = self.frames.lock();
        let mut space = owner.address_space().write();

        if !frames.has_free(requested) {
            warn!("pid {pid}: cannot allocate {size} bytes, fewer than {pages} frames free");
            return Err(AllocError::OutOfFrames { requested });
        }
        let Some(end) = space.region_end(pages) else {
            let break_pointer = space.break_pointer();
            warn!("pid {pid}: cannot allocate {size} bytes above {break_pointer}");
            return Err(AllocError::AddressSpaceExhausted {
                break_pointer,
                pages,
            });
        };
        let Some(chain) = frames.claim(pid, requested) else {
            return Err(AllocError::OutOfFrames { requested });
        };

        let base = space.advance_break(end);
        let first = base.page();
        for (page, frame) in (0..).map(|i| first.step(i)).zip(&chain) {
            trace!("pid {pid}: page {:#x} -> frame {frame}", page.as_u32());
            space.map(page, *frame);
        }

        debug!("pid {pid}: allocated {size} bytes at {base} ({pages} frames)");
        Ok(base)
    }

    /// Releases the region starting at `addr`.
    ///
    /// Every frame of the region goes back to the free pool and every page of
    /// it stops translating, so a second release of the same address fails.
    /// The owner's break pointer is left alone.
    ///
    /// # Errors
    /// - [`ReleaseError::Unmapped`] if `addr` does not translate.
    /// - [`ReleaseError::NotRegionBase`] if `addr` is mapped but is not an
    ///   address previously returned by [`allocate`](Self::allocate).
    pub fn release<O>(&self, addr: VirtAddr, owner: &O) -> Result<(), ReleaseError>
    where
        O: MemoryOwner + ?Sized,
    {
        let pid = owner.pid();
        let mut frames = self.frames.lock();
        let mut space = owner.address_space().write();

        let Some(head) = space.lookup_frame(addr) else {
            warn!("pid {pid}: cannot release unmapped address {addr}");
            return Err(ReleaseError::Unmapped(addr));
        };
        let is_base = addr.is_page_aligned()
            && frames.get(head).is_some_and(|info| info.is_head_of(pid));
        if !is_base {
            warn!("pid {pid}: {addr} is not the start of a region");
            return Err(ReleaseError::NotRegionBase(addr));
        }

        let count = frames.release_chain(head, pid);
        let unmapped = space.unmap_run(addr.page(), count);
        debug_assert_eq!(count, unmapped, "frame chain and page run disagree");

        debug!("pid {pid}: released {count} frames at {addr}");
        Ok(())
    }

    /// Releases every frame `owner` still holds and unmaps all of its pages.
    /// Returns the number of frames freed.
    #[must_use]
    pub fn release_all<O>(&self, owner: &O) -> usize
    where
        O: MemoryOwner + ?Sized,
    {
        let pid = owner.pid();
        let mut frames = self.frames.lock();
        let mut space = owner.address_space().write();
        let count = frames.release_owner(pid);
        space.unmap_all();
        debug!("pid {pid}: released all {count} frames");
        count
    }

    /// Translates `addr` through `owner`'s page tables.
    #[must_use]
    pub fn translate<O>(&self, addr: VirtAddr, owner: &O) -> Option<PhysAddr>
    where
        O: MemoryOwner + ?Sized,
    {
        owner.address_space().read().translate(addr)
    }

    /// Reads the byte at `addr`.
    ///
    /// # Errors
    /// [`AccessError::Unmapped`] if `addr` does not translate; RAM is not
    /// touched in that case.
    pub fn read_byte<O>(&self, addr: VirtAddr, owner: &O) -> Result<u8, AccessError>
    where
        O: MemoryOwner + ?Sized,
    {
        let space = owner.address_space().read();
        space
            .translate(addr)
            .and_then(|pa| self.ram.read(pa))
            .ok_or_else(|| {
                trace!("pid {}: read from unmapped address {addr}", owner.pid());
                AccessError::Unmapped(addr)
            })
    }

    /// Writes `value` to `addr`.
    ///
    /// # Errors
    /// [`AccessError::Unmapped`] if `addr` does not translate; RAM is not
    /// touched in that case.
    pub fn write_byte<O>(&self, addr: VirtAddr, owner: &O, value: u8) -> Result<(), AccessError>
    where
        O: MemoryOwner + ?Sized,
    {
        let space = owner.address_space().read();
        match space.translate(addr) {
            Some(pa) if self.ram.write(pa, value) => Ok(()),
            _ => {
                trace!("pid {}: write to unmapped address {addr}", owner.pid());
                Err(AccessError::Unmapped(addr))
            }
        }
    }

    /// Number of currently free frames.
    #[must_use]
    pub fn free_frames(&self) -> usize {
        self.frames.lock().free_count()
    }

    /// Frame table entry of `frame`, or `None` if there is no such frame.
    #[must_use]
    pub fn frame_info(&self, frame: FrameNumber) -> Option<FrameInfo> {
        self.frames.lock().get(frame).copied()
    }

    /// Frames owned by `pid` in increasing order.
    #[must_use]
    pub fn frames_owned_by(&self, pid: Pid) -> Vec<FrameNumber> {
        self.frames.lock().owned_by(pid).collect()
    }

    /// Textual listing of every occupied frame and its nonzero bytes.
    ///
    /// ```text
    /// 001: 00400-007ff - PID: 01 (idx 000, nxt: 002)
    ///         00414: 64
    /// 002: 00800-00bff - PID: 01 (idx 001, nxt: -01)
    /// ```
    #[must_use]
    pub fn dump_state(&self) -> String {
        let frames = self.frames.lock();
        FrameDump::new(&frames, &self.ram).to_string()
    }
}
