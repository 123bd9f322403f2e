//! # Per-Process Address Space
//!
//! An [`AddressSpace`] is the memory half of a process descriptor: the
//! segment table with its page tables, plus the break pointer that marks
//! where the next allocation begins.
//!
//! The break pointer only ever grows. Released regions leave holes below it
//! that are never handed out again.

use crate::address::{FrameNumber, PageNumber, PhysAddr, VirtAddr};
use crate::page_table::SegmentTable;
use simos_info::memory::{FIRST_USER_ADDRESS, PAGE_SIZE, VIRTUAL_LIMIT};

#[derive(Debug)]
pub struct AddressSpace {
    segments: SegmentTable,
    break_pointer: VirtAddr,
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressSpace {
    /// An empty address space whose first allocation lands at
    /// [`FIRST_USER_ADDRESS`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_break(VirtAddr::new(FIRST_USER_ADDRESS))
    }

    /// An empty address space starting at `break_pointer`.
    #[must_use]
    pub const fn with_break(break_pointer: VirtAddr) -> Self {
        Self {
            segments: SegmentTable::new(),
            break_pointer,
        }
    }

    #[inline]
    #[must_use]
    pub const fn break_pointer(&self) -> VirtAddr {
        self.break_pointer
    }

    #[inline]
    #[must_use]
    pub const fn segments(&self) -> &SegmentTable {
        &self.segments
    }

    /// The frame backing the page that contains `va`.
    #[must_use]
    pub fn lookup_frame(&self, va: VirtAddr) -> Option<FrameNumber> {
        if !va.is_canonical() {
            return None;
        }
        self.segments
            .get(va.first_level())?
            .get(va.second_level())
    }

    /// Translates `va` into a physical address.
    #[must_use]
    pub fn translate(&self, va: VirtAddr) -> Option<PhysAddr> {
        self.lookup_frame(va)
            .map(|frame| frame.with_offset(va.offset()))
    }

    /// End of a `pages`-page region placed at the break pointer, if it fits
    /// into the virtual address space.
    #[must_use]
    pub fn region_end(&self, pages: u32) -> Option<VirtAddr> {
        let end = u64::from(self.break_pointer.as_u32())
            + u64::from(pages) * u64::from(PAGE_SIZE);
        if end > u64::from(VIRTUAL_LIMIT) {
            return None;
        }
        u32::try_from(end).ok().map(VirtAddr::new)
    }

    /// Moves the break pointer up to `end` and returns its old value.
    pub fn advance_break(&mut self, end: VirtAddr) -> VirtAddr {
        debug_assert!(end >= self.break_pointer, "break pointer must not shrink");
        let end = end.max(self.break_pointer);
        core::mem::replace(&mut self.break_pointer, end)
    }

    /// Maps `page` onto `frame`, creating its page table if needed.
    pub fn map(&mut self, page: PageNumber, frame: FrameNumber) {
        self.segments
            .get_or_insert(page.first_level())
            .map(page.second_level(), frame);
    }

    /// Invalidates `count` consecutive pages starting at `first`, continuing
    /// into the next segment's page table when a table ends. Returns how many
    /// slots were actually live.
    pub fn unmap_run(&mut self, first: PageNumber, count: usize) -> usize {
        let mut unmapped = 0;
        let mut page = first;
        for _ in 0..count {
            if let Some(table) = self.segments.get_mut(page.first_level())
                && table.unmap(page.second_level()).is_some()
            {
                unmapped += 1;
            }
            page = page.step(1);
        }
        unmapped
    }

    /// Invalidates every page. The break pointer stays where it is.
    pub fn unmap_all(&mut self) -> usize {
        let mut unmapped = 0;
        for table in self.segments.tables_mut() {
            for index in 0..table.len() {
                if table.unmap(index).is_some() {
                    unmapped += 1;
                }
            }
        }
        unmapped
    }

    /// All live mappings in increasing virtual order.
    pub fn mappings(&self) -> impl Iterator<Item = (PageNumber, FrameNumber)> + '_ {
        self.segments.tables().flat_map(|(first, table)| {
            table.mapped().map(move |(second, frame)| {
                (page_number(first, second), frame)
            })
        })
    }
}

#[inline]
fn page_number(first: usize, second: usize) -> PageNumber {
    let raw = (first << simos_info::memory::PAGE_LEN) | second;
    PageNumber::new(u32::try_from(raw).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod test {
    use super::*;
    use simos_info::memory::PAGE_TABLE_ENTRIES;

    #[test]
    fn fresh_space_maps_nothing() {
        let space = AddressSpace::new();
        assert_eq!(space.break_pointer().as_u32(), PAGE_SIZE);
        assert_eq!(space.translate(VirtAddr::zero()), None);
        assert_eq!(space.translate(VirtAddr::new(PAGE_SIZE)), None);
    }

    #[test]
    fn translation_keeps_the_offset() {
        let mut space = AddressSpace::new();
        let page = VirtAddr::new(PAGE_SIZE).page();
        space.map(page, FrameNumber::new(4));
        let pa = space.translate(VirtAddr::new(PAGE_SIZE + 17)).unwrap();
        assert_eq!(pa, FrameNumber::new(4).with_offset(17));
    }

    #[test]
    fn region_end_respects_the_virtual_limit() {
        let space = AddressSpace::with_break(VirtAddr::new(VIRTUAL_LIMIT - 2 * PAGE_SIZE));
        assert_eq!(space.region_end(2), Some(VirtAddr::new(VIRTUAL_LIMIT)));
        assert_eq!(space.region_end(3), None);
        assert_eq!(space.region_end(u32::MAX), None);
    }

    #[test]
    fn advance_break_returns_the_region_base() {
        let mut space = AddressSpace::new();
        let end = space.region_end(2).unwrap();
        let base = space.advance_break(end);
        assert_eq!(base.as_u32(), PAGE_SIZE);
        assert_eq!(space.break_pointer().as_u32(), 3 * PAGE_SIZE);
    }

    #[test]
    fn consecutive_regions_stack_up() {
        let mut space = AddressSpace::new();
        let first = space.advance_break(space.region_end(1).unwrap());
        let second = space.advance_break(space.region_end(3).unwrap());
        assert_eq!(second.as_u32(), first.as_u32() + PAGE_SIZE);
        assert_eq!(space.break_pointer().as_u32(), 5 * PAGE_SIZE);
    }

    #[test]
    fn unmap_run_wraps_into_the_next_segment() {
        let mut space = AddressSpace::with_break(VirtAddr::zero());
        let last = PAGE_TABLE_ENTRIES as u32 - 1;
        let first = PageNumber::new(last);
        space.map(first, FrameNumber::new(0));
        space.map(first.step(1), FrameNumber::new(1));
        assert_eq!(first.step(1).first_level(), 1);

        assert_eq!(space.unmap_run(first, 2), 2);
        assert_eq!(space.lookup_frame(first.base()), None);
        assert_eq!(space.lookup_frame(first.step(1).base()), None);
        // Both page tables survive, just empty.
        assert_eq!(space.segments().tables().count(), 2);
    }

    #[test]
    fn mappings_are_listed_in_virtual_order() {
        let mut space = AddressSpace::with_break(VirtAddr::zero());
        space.map(PageNumber::new(40), FrameNumber::new(2));
        space.map(PageNumber::new(3), FrameNumber::new(9));
        let all: Vec<_> = space.mappings().collect();
        assert_eq!(
            all,
            [
                (PageNumber::new(3), FrameNumber::new(9)),
                (PageNumber::new(40), FrameNumber::new(2)),
            ]
        );
        assert_eq!(space.unmap_all(), 2);
        assert_eq!(space.mappings().count(), 0);
    }

    #[test]
    fn non_canonical_addresses_never_translate() {
        let mut space = AddressSpace::with_break(VirtAddr::zero());
        space.map(PageNumber::new(0), FrameNumber::new(0));
        assert!(space.translate(VirtAddr::new(5)).is_some());
        // Same low 20 bits, but beyond the address space.
        assert!(space.translate(VirtAddr::new(VIRTUAL_LIMIT + 5)).is_none());
    }
}
