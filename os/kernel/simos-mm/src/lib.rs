//! # Simulated Virtual Memory
//!
//! This crate implements the memory half of the simulated kernel: a fixed
//! block of physical RAM carved into frames, and per-process virtual address
//! spaces that map pages onto those frames through a two-level table.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   MemoryManager                     │
//! │    • allocate / release / read_byte / write_byte    │
//! │    • frame table lock, dump_state                   │
//! └──────────┬──────────────────────────────┬───────────┘
//!            │                              │
//! ┌──────────▼───────────┐      ┌───────────▼───────────┐
//! │     FrameTable       │      │  AddressSpace (per    │
//! │  • owner/index/next  │      │  process, RwSpinLock) │
//! │  • first-fit chains  │      │  • SegmentTable       │
//! └──────────┬───────────┘      │    └─ PageTable       │
//!            │                  │  • break pointer      │
//! ┌──────────▼───────────┐      └───────────────────────┘
//! │     PhysicalRam      │
//! │  • atomic bytes      │
//! └──────────────────────┘
//! ```
//!
//! ## Translation
//!
//! A [`VirtAddr`] splits into `first_level`, `second_level` and `offset`
//! ([`VirtualAddressBits`]). The first level picks a [`PageTable`] from the
//! process's [`SegmentTable`], the second level picks a [`PageSlot`], and a
//! mapped slot yields the frame. The physical address is
//! `(frame << OFFSET_LEN) | offset`. Any miss is reported as an error value,
//! never a panic.
//!
//! ## Allocation
//!
//! Allocation rounds the request up to whole pages, checks that enough frames
//! are free (they need not be adjacent) and that the region fits below the
//! virtual limit, then maps the pages at the break pointer. The frames of one
//! allocation form a chain in the [`FrameTable`] so that releasing the first
//! address of the region finds all of them.
//!
//! ## Process Integration
//!
//! The manager does not know the process descriptor type. Anything that can
//! name its [`Pid`] and hand out its locked [`AddressSpace`] implements
//! [`MemoryOwner`].
//!
//! ```rust
//! use simos_info::Pid;
//! use simos_mm::{AddressSpace, MemoryConfig, MemoryManager, MemoryOwner};
//! use simos_sync::RwSpinLock;
//!
//! struct Task {
//!     pid: Pid,
//!     space: RwSpinLock<AddressSpace>,
//! }
//!
//! impl MemoryOwner for Task {
//!     fn pid(&self) -> Pid {
//!         self.pid
//!     }
//!     fn address_space(&self) -> &RwSpinLock<AddressSpace> {
//!         &self.space
//!     }
//! }
//!
//! let mm = MemoryManager::new(MemoryConfig::with_frames(8).unwrap());
//! let task = Task { pid: Pid::FIRST, space: RwSpinLock::default() };
//!
//! let base = mm.allocate(100, &task).unwrap();
//! mm.write_byte(base, &task, 42).unwrap();
//! assert_eq!(mm.read_byte(base, &task), Ok(42));
//! mm.release(base, &task).unwrap();
//! assert!(mm.read_byte(base, &task).is_err());
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

pub mod address;
pub mod address_space;
pub mod config;
mod dump;
pub mod error;
pub mod frame_table;
pub mod manager;
pub mod page_table;
pub mod ram;

pub use address::{FrameNumber, PageNumber, PhysAddr, VirtAddr, VirtualAddressBits};
pub use address_space::AddressSpace;
pub use config::MemoryConfig;
pub use error::{AccessError, AllocError, MemoryConfigError, ReleaseError};
pub use frame_table::{FrameInfo, FrameTable};
pub use manager::MemoryManager;
pub use page_table::{PageSlot, PageTable, SegmentTable};
pub use ram::PhysicalRam;

use alloc::sync::Arc;
use simos_info::Pid;
use simos_sync::RwSpinLock;

/// A process as seen by the memory manager.
pub trait MemoryOwner {
    /// Identity recorded as the owner of every frame allocated on behalf of
    /// this process.
    fn pid(&self) -> Pid;

    /// The process's page tables and break pointer.
    fn address_space(&self) -> &RwSpinLock<AddressSpace>;
}

impl<T: MemoryOwner + ?Sized> MemoryOwner for &T {
    fn pid(&self) -> Pid {
        (**self).pid()
    }

    fn address_space(&self) -> &RwSpinLock<AddressSpace> {
        (**self).address_space()
    }
}

impl<T: MemoryOwner + ?Sized> MemoryOwner for Arc<T> {
    fn pid(&self) -> Pid {
        (**self).pid()
    }

    fn address_space(&self) -> &RwSpinLock<AddressSpace> {
        (**self).address_space()
    }
}
