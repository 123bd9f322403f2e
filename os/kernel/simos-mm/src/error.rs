use crate::address::VirtAddr;

/// Why an allocation could not be satisfied. A failed allocation changes
/// nothing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    #[error("cannot allocate zero bytes")]
    ZeroSize,
    #[error("out of physical memory: {requested} free frames required")]
    OutOfFrames { requested: usize },
    #[error("virtual address space exhausted: {pages} pages do not fit above {break_pointer}")]
    AddressSpaceExhausted { break_pointer: VirtAddr, pages: u32 },
}

/// Why a region could not be released. A failed release changes nothing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReleaseError {
    #[error("address {0} is not mapped")]
    Unmapped(VirtAddr),
    #[error("address {0} is not the start of an allocated region")]
    NotRegionBase(VirtAddr),
}

/// A byte access that could not be performed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("access to unmapped address {0}")]
    Unmapped(VirtAddr),
}

/// An unusable memory configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryConfigError {
    #[error("RAM size must not be zero")]
    ZeroSize,
    #[error("RAM size {0} is not a multiple of the page size")]
    Unaligned(usize),
    #[error("RAM size {0} exceeds the physical address range")]
    TooLarge(usize),
}
