use core::fmt;
use simos_info::Pid;
use simos_mm::{AddressSpace, MemoryOwner};
use simos_sched::{Prioritized, Priority};
use simos_sync::RwSpinLock;

/// Process control block.
///
/// Holds what both halves of the simulated kernel need: the memory manager
/// sees it as a [`MemoryOwner`], the scheduler as something [`Prioritized`].
pub struct Pcb {
    pid: Pid,
    priority: Priority,
    space: RwSpinLock<AddressSpace>,
}

impl Pcb {
    /// A process with an empty address space.
    #[must_use]
    pub const fn new(pid: Pid, priority: Priority) -> Self {
        Self {
            pid,
            priority,
            space: RwSpinLock::new(AddressSpace::new()),
        }
    }

    #[inline]
    #[must_use]
    pub const fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }
}

impl MemoryOwner for Pcb {
    fn pid(&self) -> Pid {
        self.pid
    }

    fn address_space(&self) -> &RwSpinLock<AddressSpace> {
        &self.space
    }
}

impl Prioritized for Pcb {
    fn priority(&self) -> Priority {
        self.priority
    }
}

impl fmt::Debug for Pcb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Pcb");
        s.field("pid", &self.pid).field("priority", &self.priority);
        match self.space.try_read() {
            Some(space) => s.field("break_pointer", &space.break_pointer()),
            None => s.field("break_pointer", &"<locked>"),
        };
        s.finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use simos_info::memory::FIRST_USER_ADDRESS;

    #[test]
    fn fresh_pcb_starts_above_the_null_page() {
        let pcb = Pcb::new(Pid::FIRST, Priority::new(3));
        assert_eq!(
            pcb.address_space().read().break_pointer().as_u32(),
            FIRST_USER_ADDRESS
        );
        assert_eq!(Prioritized::priority(&pcb), Priority::new(3));
        assert_eq!(MemoryOwner::pid(&pcb), Pid::FIRST);
    }

    #[test]
    fn debug_does_not_block_on_a_held_lock() {
        let pcb = Pcb::new(Pid::FIRST, Priority::LOWEST);
        let _guard = pcb.address_space().write();
        assert!(format!("{pcb:?}").contains("<locked>"));
    }
}
