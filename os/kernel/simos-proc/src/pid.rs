use core::sync::atomic::{AtomicU32, Ordering};
use simos_info::Pid;

/// Hands out process ids in increasing order, starting at [`Pid::FIRST`].
/// Ids are never reused.
#[derive(Debug)]
pub struct PidAllocator {
    next: AtomicU32,
}

impl Default for PidAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl PidAllocator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU32::new(Pid::FIRST.as_u32()),
        }
    }

    /// The next unused id, or `None` once the id space is exhausted.
    #[must_use]
    pub fn allocate(&self) -> Option<Pid> {
        let raw = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
            .ok()?;
        Pid::new(raw)
    }
}
