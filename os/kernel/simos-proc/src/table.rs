//! # Process Table
//!
//! The [`ProcessTable`] owns every live [`Pcb`]. Other parts of the system
//! (the scheduler queues, worker threads) only hold `Arc` clones.
//! Terminating a process removes it from the table and gives every frame it
//! still holds back to the memory manager.

use crate::error::ProcError;
use crate::pcb::Pcb;
use crate::pid::PidAllocator;
use alloc::sync::Arc;
use alloc::vec::Vec;
use log::{debug, warn};
use simos_info::Pid;
use simos_mm::MemoryManager;
use simos_sched::Priority;
use simos_sync::SpinLock;

#[derive(Debug, Default)]
pub struct ProcessTable {
    procs: SpinLock<Vec<Arc<Pcb>>>,
    pids: PidAllocator,
}

impl ProcessTable {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            procs: SpinLock::new(Vec::new()),
            pids: PidAllocator::new(),
        }
    }

    /// Creates a process with a fresh pid and an empty address space.
    ///
    /// # Errors
    /// [`ProcError::PidsExhausted`] once no pid is left.
    pub fn spawn(&self, priority: Priority) -> Result<Arc<Pcb>, ProcError> {
        let Some(pid) = self.pids.allocate() else {
            warn!("cannot spawn process: pids exhausted");
            return Err(ProcError::PidsExhausted);
        };
        let pcb = Arc::new(Pcb::new(pid, priority));
        self.procs.lock().push(Arc::clone(&pcb));
        debug!("spawned pid {pid} with priority {priority}");
        Ok(pcb)
    }

    #[must_use]
    pub fn get(&self, pid: Pid) -> Option<Arc<Pcb>> {
        self.procs.lock().iter().find(|p| p.pid() == pid).cloned()
    }

    /// Removes `pid` from the table and releases all of its memory.
    /// Returns the number of frames freed.
    ///
    /// # Errors
    /// [`ProcError::UnknownPid`] if no such process is alive.
    pub fn terminate(&self, pid: Pid, mm: &MemoryManager) -> Result<usize, ProcError> {
        let pcb = {
            let mut procs = self.procs.lock();
            let Some(pos) = procs.iter().position(|p| p.pid() == pid) else {
                warn!("cannot terminate unknown pid {pid}");
                return Err(ProcError::UnknownPid(pid));
            };
            procs.swap_remove(pos)
        };
        let freed = mm.release_all(&pcb);
        debug!("terminated pid {pid}, {freed} frames freed");
        Ok(freed)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.procs.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.procs.lock().is_empty()
    }

    /// Pids of all live processes, sorted.
    #[must_use]
    pub fn pids(&self) -> Vec<Pid> {
        let mut pids: Vec<_> = self.procs.lock().iter().map(|p| p.pid()).collect();
        pids.sort_unstable();
        pids
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use simos_mm::MemoryConfig;

    #[test]
    fn spawn_registers_the_process() {
        let table = ProcessTable::new();
        let a = table.spawn(Priority::new(1)).unwrap();
        let b = table.spawn(Priority::new(2)).unwrap();
        assert_ne!(a.pid(), b.pid());
        assert_eq!(table.len(), 2);
        assert!(Arc::ptr_eq(&table.get(b.pid()).unwrap(), &b));
        assert_eq!(table.pids(), [a.pid(), b.pid()]);
    }

    #[test]
    fn terminate_frees_memory_and_forgets_the_pid() {
        let mm = MemoryManager::new(MemoryConfig::with_frames(4).unwrap());
        let table = ProcessTable::new();
        let pcb = table.spawn(Priority::LOWEST).unwrap();
        mm.allocate(2000, &pcb).unwrap();
        assert_eq!(mm.free_frames(), 2);

        assert_eq!(table.terminate(pcb.pid(), &mm), Ok(2));
        assert_eq!(mm.free_frames(), 4);
        assert!(table.get(pcb.pid()).is_none());
        assert_eq!(
            table.terminate(pcb.pid(), &mm),
            Err(ProcError::UnknownPid(pcb.pid()))
        );
        assert!(table.is_empty());
    }
}
