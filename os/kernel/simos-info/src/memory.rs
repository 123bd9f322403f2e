//! # Memory Geometry

/// Width of a virtual address in bits.
pub const ADDRESS_SIZE: u32 = 20;

/// Number of offset bits; a page (and a frame) holds `1 << OFFSET_LEN` bytes.
pub const OFFSET_LEN: u32 = 10;

/// Number of second-level (page table) index bits.
pub const PAGE_LEN: u32 = 5;

/// Number of first-level (segment table) index bits.
pub const SEGMENT_LEN: u32 = ADDRESS_SIZE - OFFSET_LEN - PAGE_LEN;

/// Size of a page and of a physical frame in bytes.
pub const PAGE_SIZE: u32 = 1 << OFFSET_LEN;

/// Number of slots in a page table.
pub const PAGE_TABLE_ENTRIES: usize = 1 << PAGE_LEN;

/// Number of slots in a segment table.
pub const SEGMENT_TABLE_ENTRIES: usize = 1 << SEGMENT_LEN;

/// One past the highest virtual address a process may use.
pub const VIRTUAL_LIMIT: u32 = 1 << ADDRESS_SIZE;

/// Default size of the simulated physical RAM in bytes.
pub const RAM_SIZE: usize = 1 << 18;

/// Number of physical frames in a RAM of the default size.
pub const NUM_FRAMES: usize = RAM_SIZE / PAGE_SIZE as usize;

/// The first virtual address handed out to a fresh process.
///
/// The page at address zero is never mapped, so `0` can't be mistaken
/// for a valid allocation.
pub const FIRST_USER_ADDRESS: u32 = PAGE_SIZE;

const _: () = {
    assert!(SEGMENT_LEN > 0);
    assert!(OFFSET_LEN + PAGE_LEN + SEGMENT_LEN == ADDRESS_SIZE);
    assert!(ADDRESS_SIZE < u32::BITS);
    assert!(RAM_SIZE.is_multiple_of(PAGE_SIZE as usize));
    assert!(NUM_FRAMES > 0);
    assert!(FIRST_USER_ADDRESS < VIRTUAL_LIMIT);
};
