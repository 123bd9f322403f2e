//! # Simulated Machine
//!
//! [`Machine`] bundles one [`MemoryManager`], one [`Scheduler`] and the
//! [`ProcessTable`]. It is created once at start-up and passed by reference
//! to every worker; nothing in the simulation is global.

use crate::config::MachineConfig;
use crate::workload::{self, WorkloadReport};
use log::{debug, info};
use simos_info::Pid;
use simos_mm::{AccessError, AllocError, MemoryManager, ReleaseError, VirtAddr};
use simos_proc::{Pcb, ProcError, ProcessTable};
use simos_sched::{Priority, SchedError, Scheduler};
use std::sync::Arc;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error(transparent)]
    Process(#[from] ProcError),
    #[error(transparent)]
    Schedule(#[from] SchedError),
}

#[derive(Debug)]
pub struct Machine {
    mm: MemoryManager,
    sched: Scheduler<Arc<Pcb>>,
    procs: ProcessTable,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(&MachineConfig::default())
    }
}

impl Machine {
    #[must_use]
    pub fn new(config: &MachineConfig) -> Self {
        Self {
            mm: MemoryManager::new(config.memory),
            sched: Scheduler::new(config.scheduler),
            procs: ProcessTable::new(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn memory(&self) -> &MemoryManager {
        &self.mm
    }

    #[inline]
    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler<Arc<Pcb>> {
        &self.sched
    }

    #[inline]
    #[must_use]
    pub const fn processes(&self) -> &ProcessTable {
        &self.procs
    }

    /// Creates a process and admits it into the current scheduling round.
    ///
    /// # Errors
    /// If no pid is left or the ready queue is full. A process that cannot be
    /// admitted is not kept.
    pub fn spawn(&self, priority: Priority) -> Result<Arc<Pcb>, SpawnError> {
        let pcb = self.procs.spawn(priority)?;
        if let Err(e) = self.sched.admit_new(Arc::clone(&pcb)) {
            self.procs.terminate(pcb.pid(), &self.mm)?;
            return Err(e.into());
        }
        Ok(pcb)
    }

    /// Ends a process and returns the number of frames it still held.
    ///
    /// # Errors
    /// [`ProcError::UnknownPid`] if the process is not alive.
    pub fn terminate(&self, pid: Pid) -> Result<usize, ProcError> {
        self.procs.terminate(pid, &self.mm)
    }

    /// Ends every process. Returns the number of frames freed.
    #[must_use]
    pub fn terminate_all(&self) -> usize {
        self.procs
            .pids()
            .into_iter()
            .filter_map(|pid| self.terminate(pid).ok())
            .sum()
    }

    /// See [`MemoryManager::allocate`].
    ///
    /// # Errors
    /// See [`MemoryManager::allocate`].
    pub fn allocate(&self, size: u32, process: &Pcb) -> Result<VirtAddr, AllocError> {
        self.mm.allocate(size, process)
    }

    /// See [`MemoryManager::release`].
    ///
    /// # Errors
    /// See [`MemoryManager::release`].
    pub fn release(&self, addr: VirtAddr, process: &Pcb) -> Result<(), ReleaseError> {
        self.mm.release(addr, process)
    }

    /// See [`MemoryManager::read_byte`].
    ///
    /// # Errors
    /// See [`MemoryManager::read_byte`].
    pub fn read_byte(&self, addr: VirtAddr, process: &Pcb) -> Result<u8, AccessError> {
        self.mm.read_byte(addr, process)
    }

    /// See [`MemoryManager::write_byte`].
    ///
    /// # Errors
    /// See [`MemoryManager::write_byte`].
    pub fn write_byte(&self, addr: VirtAddr, process: &Pcb, value: u8) -> Result<(), AccessError> {
        self.mm.write_byte(addr, process, value)
    }

    #[must_use]
    pub fn dump_state(&self) -> String {
        self.mm.dump_state()
    }

    #[must_use]
    pub fn schedule_next(&self) -> Option<Arc<Pcb>> {
        self.sched.schedule_next()
    }

    /// # Errors
    /// [`SchedError::QueueFull`] if the run queue has no room.
    pub fn requeue_yielding(&self, process: Arc<Pcb>) -> Result<(), SchedError> {
        self.sched.requeue_yielding(process)
    }

    /// # Errors
    /// [`SchedError::QueueFull`] if the ready queue has no room.
    pub fn admit_new(&self, process: Arc<Pcb>) -> Result<(), SchedError> {
        self.sched.admit_new(process)
    }

    /// Runs the demo workload on `workers` threads until every queued
    /// process has been dispatched `bursts` times.
    ///
    /// Each dispatch allocates a region, writes a marker to its first and
    /// last byte, reads both back and releases every other region. Finished
    /// processes stay alive with the memory they kept.
    #[must_use]
    pub fn run_workers(&self, workers: usize, bursts: u32) -> WorkloadReport {
        info!("running {bursts} bursts per process on {workers} workers");
        let report = workload::run(self, workers.max(1), bursts);
        debug!("workload finished: {report:?}");
        report
    }
}
