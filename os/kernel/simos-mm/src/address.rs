//! # Simulated Address Types
//!
//! Strongly typed wrappers so virtual addresses, physical addresses, virtual
//! page numbers and physical frame numbers can't be mixed up.
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`VirtAddr`] | A byte address in a process's virtual address space. |
//! | [`PageNumber`] | A virtual page, i.e. a [`VirtAddr`] without its offset. |
//! | [`FrameNumber`] | Index of a physical frame in RAM and the frame table. |
//! | [`PhysAddr`] | A byte address in the simulated RAM. |

use bitfield_struct::bitfield;
use core::fmt;
use simos_info::memory::{OFFSET_LEN, PAGE_LEN, PAGE_SIZE, SEGMENT_LEN, VIRTUAL_LIMIT};

/// Field layout of a virtual address.
///
/// | Bits  | Field          |
/// |-------|----------------|
/// | 0–9   | `offset`       |
/// | 10–14 | `second_level` |
/// | 15–19 | `first_level`  |
/// | 20–31 | unused         |
#[bitfield(u32)]
pub struct VirtualAddressBits {
    /// Byte offset within the page.
    #[bits(10)]
    pub offset: u16,
    /// Index into the segment's page table.
    #[bits(5)]
    pub second_level: u8,
    /// Index into the process's segment table.
    #[bits(5)]
    pub first_level: u8,
    #[bits(12)]
    __: u16,
}

const _: () = {
    assert!(OFFSET_LEN == 10, "VirtualAddressBits::offset width");
    assert!(PAGE_LEN == 5, "VirtualAddressBits::second_level width");
    assert!(SEGMENT_LEN == 5, "VirtualAddressBits::first_level width");
};

/// A virtual address of a simulated process.
///
/// Only the low `ADDRESS_SIZE` bits are meaningful; addresses at or above
/// [`VIRTUAL_LIMIT`] never translate.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VirtAddr(u32);

impl VirtAddr {
    #[inline]
    #[must_use]
    pub const fn new(v: u32) -> Self {
        Self(v)
    }

    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Whether the address lies inside the addressable virtual range.
    #[inline]
    #[must_use]
    pub const fn is_canonical(self) -> bool {
        self.0 < VIRTUAL_LIMIT
    }

    #[inline]
    #[must_use]
    pub const fn bits(self) -> VirtualAddressBits {
        VirtualAddressBits::from_bits(self.0)
    }

    #[inline]
    #[must_use]
    pub fn first_level(self) -> usize {
        usize::from(self.bits().first_level())
    }

    #[inline]
    #[must_use]
    pub fn second_level(self) -> usize {
        usize::from(self.bits().second_level())
    }

    #[inline]
    #[must_use]
    pub fn offset(self) -> u32 {
        u32::from(self.bits().offset())
    }

    /// The virtual page containing this address.
    #[inline]
    #[must_use]
    pub const fn page(self) -> PageNumber {
        PageNumber(self.0 >> OFFSET_LEN)
    }

    #[inline]
    #[must_use]
    pub const fn is_page_aligned(self) -> bool {
        self.0 & (PAGE_SIZE - 1) == 0
    }

    #[inline]
    #[must_use]
    pub const fn checked_add(self, rhs: u32) -> Option<Self> {
        match self.0.checked_add(rhs) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Debug for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VA(0x{:05X})", self.0)
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:05x}", self.0)
    }
}

impl From<u32> for VirtAddr {
    #[inline]
    fn from(v: u32) -> Self {
        Self::new(v)
    }
}

impl From<VirtAddr> for u32 {
    #[inline]
    fn from(v: VirtAddr) -> Self {
        v.0
    }
}

/// A virtual page number: the first and second level indices of an address.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PageNumber(u32);

impl PageNumber {
    #[inline]
    #[must_use]
    pub const fn new(v: u32) -> Self {
        Self(v)
    }

    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn first_level(self) -> usize {
        (self.0 >> PAGE_LEN) as usize
    }

    #[inline]
    #[must_use]
    pub const fn second_level(self) -> usize {
        (self.0 & ((1 << PAGE_LEN) - 1)) as usize
    }

    /// First byte of the page.
    #[inline]
    #[must_use]
    pub const fn base(self) -> VirtAddr {
        VirtAddr(self.0 << OFFSET_LEN)
    }

    /// The page `n` pages further up.
    #[inline]
    #[must_use]
    pub const fn step(self, n: u32) -> Self {
        Self(self.0 + n)
    }
}

/// Index of a physical frame.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FrameNumber(u32);

impl FrameNumber {
    #[inline]
    #[must_use]
    pub const fn new(v: u32) -> Self {
        Self(v)
    }

    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// First byte of the frame.
    #[inline]
    #[must_use]
    pub const fn base(self) -> PhysAddr {
        PhysAddr(self.0 << OFFSET_LEN)
    }

    /// Physical address of byte `offset` within the frame.
    #[inline]
    #[must_use]
    pub const fn with_offset(self, offset: u32) -> PhysAddr {
        debug_assert!(offset < PAGE_SIZE);
        PhysAddr((self.0 << OFFSET_LEN) | offset)
    }
}

impl fmt::Debug for FrameNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({})", self.0)
    }
}

impl fmt::Display for FrameNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A byte address in the simulated RAM.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PhysAddr(u32);

impl PhysAddr {
    #[inline]
    #[must_use]
    pub const fn new(v: u32) -> Self {
        Self(v)
    }

    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    #[inline]
    #[must_use]
    pub const fn frame(self) -> FrameNumber {
        FrameNumber(self.0 >> OFFSET_LEN)
    }
}

impl fmt::Debug for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PA(0x{:05X})", self.0)
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:05x}", self.0)
    }
}
