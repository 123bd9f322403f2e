//! # Two-Level Page Tables
//!
//! - [`SegmentTable`]: first level, indexed by a virtual address's
//!   `first_level` field. Each populated slot owns a [`PageTable`].
//! - [`PageTable`]: second level, indexed by `second_level`. Each slot is a
//!   [`PageSlot`].
//!
//! Both tables track a high-water `len` (highest populated index + 1).
//! Lookups at or above `len` miss. Tables are never shrunk or removed; a
//! released page just turns back into [`PageSlot::Unmapped`].

use crate::address::FrameNumber;
use alloc::boxed::Box;
use simos_info::memory::{PAGE_TABLE_ENTRIES, SEGMENT_TABLE_ENTRIES};

/// State of one page table slot.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PageSlot {
    #[default]
    Unmapped,
    Mapped(FrameNumber),
}

impl PageSlot {
    #[inline]
    #[must_use]
    pub const fn frame(self) -> Option<FrameNumber> {
        match self {
            Self::Unmapped => None,
            Self::Mapped(frame) => Some(frame),
        }
    }
}

/// The second translation level.
#[derive(Debug, Clone)]
pub struct PageTable {
    slots: [PageSlot; PAGE_TABLE_ENTRIES],
    len: usize,
}

impl Default for PageTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PageTable {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [PageSlot::Unmapped; PAGE_TABLE_ENTRIES],
            len: 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The frame mapped at `index`, if the slot is live.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<FrameNumber> {
        if index >= self.len {
            return None;
        }
        self.slots.get(index).copied().and_then(PageSlot::frame)
    }

    /// Maps `index` to `frame` and extends the high-water mark.
    ///
    /// # Panics
    /// If `index` is outside the table. Indices come from the address
    /// bitfield and always fit.
    pub fn map(&mut self, index: usize, frame: FrameNumber) {
        self.slots[index] = PageSlot::Mapped(frame);
        self.len = self.len.max(index + 1);
    }

    /// Invalidates the slot at `index`, returning the frame it held.
    pub fn unmap(&mut self, index: usize) -> Option<FrameNumber> {
        let slot = self.slots.get_mut(index)?;
        core::mem::take(slot).frame()
    }

    /// Live slots as `(index, frame)` pairs.
    pub fn mapped(&self) -> impl Iterator<Item = (usize, FrameNumber)> + '_ {
        self.slots[..self.len]
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.frame().map(|f| (i, f)))
    }
}

/// The first translation level.
#[derive(Debug)]
pub struct SegmentTable {
    slots: [Option<Box<PageTable>>; SEGMENT_TABLE_ENTRIES],
    len: usize,
}

impl Default for SegmentTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentTable {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; SEGMENT_TABLE_ENTRIES],
            len: 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The page table registered at `index`, if any.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PageTable> {
        if index >= self.len {
            return None;
        }
        self.slots.get(index)?.as_deref()
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut PageTable> {
        if index >= self.len {
            return None;
        }
        self.slots.get_mut(index)?.as_deref_mut()
    }

    /// The page table at `index`, registering an empty one first if needed.
    ///
    /// # Panics
    /// If `index` is outside the table. Indices come from the address
    /// bitfield and always fit.
    pub fn get_or_insert(&mut self, index: usize) -> &mut PageTable {
        self.len = self.len.max(index + 1);
        self.slots[index].get_or_insert_with(|| Box::new(PageTable::new()))
    }

    /// Registered page tables as `(index, table)` pairs.
    pub fn tables(&self) -> impl Iterator<Item = (usize, &PageTable)> + '_ {
        self.slots[..self.len]
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_deref().map(|t| (i, t)))
    }

    pub(crate) fn tables_mut(&mut self) -> impl Iterator<Item = &mut PageTable> + '_ {
        self.slots[..self.len].iter_mut().filter_map(Option::as_deref_mut)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lookups_miss_above_the_high_water_mark() {
        let mut pt = PageTable::new();
        assert_eq!(pt.get(0), None);
        pt.map(3, FrameNumber::new(7));
        assert_eq!(pt.len(), 4);
        assert_eq!(pt.get(3), Some(FrameNumber::new(7)));
        assert_eq!(pt.get(2), None, "slots below the mark can still be empty");
        assert_eq!(pt.get(4), None);
    }

    #[test]
    fn unmapped_slots_stay_dead_but_keep_the_table_size() {
        let mut pt = PageTable::new();
        pt.map(0, FrameNumber::new(1));
        pt.map(1, FrameNumber::new(2));
        assert_eq!(pt.unmap(1), Some(FrameNumber::new(2)));
        assert_eq!(pt.unmap(1), None);
        assert_eq!(pt.get(1), None);
        assert_eq!(pt.len(), 2);
        assert_eq!(pt.mapped().collect::<Vec<_>>(), [(0, FrameNumber::new(1))]);
    }

    #[test]
    fn segment_table_registers_page_tables_on_demand() {
        let mut st = SegmentTable::new();
        assert!(st.get(2).is_none());
        st.get_or_insert(2).map(0, FrameNumber::new(5));
        assert_eq!(st.len(), 3);
        assert!(st.get(0).is_none());
        assert_eq!(st.get(2).and_then(|pt| pt.get(0)), Some(FrameNumber::new(5)));

        // A second request returns the same table.
        st.get_or_insert(2).map(1, FrameNumber::new(6));
        assert_eq!(st.get(2).map(PageTable::len), Some(2));
        assert_eq!(st.tables().count(), 1);
    }
}
