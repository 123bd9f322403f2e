//! # Two-Queue Round Scheduler
//!
//! [`Scheduler`] keeps two [`PriorityQueue`]s behind one lock:
//!
//! - the **ready** queue holds processes that still get a turn in the
//!   current round, and
//! - the **run** queue collects processes that already had their turn and
//!   yielded.
//!
//! [`schedule_next`](Scheduler::schedule_next) serves the ready queue until
//! it runs dry. At that point the whole run queue moves over, re-sorted by
//! priority, and the next round begins.

use crate::config::SchedulerConfig;
use crate::error::{QueueKind, SchedError};
use crate::priority::{Prioritized, Priority};
use crate::queue::PriorityQueue;
use alloc::vec::Vec;
use log::{debug, trace, warn};
use simos_sync::SpinLock;

struct Queues<P> {
    ready: PriorityQueue<P>,
    run: PriorityQueue<P>,
}

impl<P: Prioritized> Queues<P> {
    fn queue(&mut self, kind: QueueKind) -> &mut PriorityQueue<P> {
        match kind {
            QueueKind::Ready => &mut self.ready,
            QueueKind::Run => &mut self.run,
        }
    }

    /// Moves every run queue entry over to the ready queue.
    fn rotate(&mut self) {
        let mut moved = 0usize;
        while let Some(entry) = self.run.pop() {
            if self.ready.push(entry).is_err() {
                // Both queues share one capacity and ready is empty here.
                warn!("ready queue overflowed during rotation");
                break;
            }
            moved += 1;
        }
        if moved > 0 {
            debug!("new round with {moved} processes");
        }
    }
}

pub struct Scheduler<P> {
    queues: SpinLock<Queues<P>>,
    capacity: usize,
}

impl<P: Prioritized> Default for Scheduler<P> {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl<P: Prioritized> Scheduler<P> {
    #[must_use]
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            queues: SpinLock::new(Queues {
                ready: PriorityQueue::new(config.capacity),
                run: PriorityQueue::new(config.capacity),
            }),
            capacity: config.capacity,
        }
    }

    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Takes the next process to dispatch.
    ///
    /// Returns the highest-priority process of the ready queue. An empty
    /// ready queue first takes over everything in the run queue. `None` only
    /// when both queues are empty.
    #[must_use]
    pub fn schedule_next(&self) -> Option<P> {
        let mut queues = self.queues.lock();
        if queues.ready.is_empty() {
            queues.rotate();
        }
        let next = queues.ready.pop();
        if let Some(p) = &next {
            trace!("dispatching process with priority {}", p.priority());
        }
        next
    }

    /// Parks a process that yielded but is not finished until the next round.
    ///
    /// # Errors
    /// [`SchedError::QueueFull`] if the run queue has no room; the process is
    /// dropped from the scheduler and the caller keeps ownership through its
    /// other handles.
    pub fn requeue_yielding(&self, process: P) -> Result<(), SchedError> {
        self.enqueue(QueueKind::Run, process)
    }

    /// Admits a new process into the current round.
    ///
    /// # Errors
    /// [`SchedError::QueueFull`] if the ready queue has no room.
    pub fn admit_new(&self, process: P) -> Result<(), SchedError> {
        self.enqueue(QueueKind::Ready, process)
    }

    fn enqueue(&self, queue: QueueKind, process: P) -> Result<(), SchedError> {
        let priority = process.priority();
        let mut queues = self.queues.lock();
        if queues.queue(queue).push(process).is_err() {
            warn!("{queue} queue full, dropping process with priority {priority}");
            return Err(SchedError::QueueFull {
                queue,
                capacity: self.capacity,
            });
        }
        trace!("queued process with priority {priority} on {queue} queue");
        Ok(())
    }

    /// Whether both queues are empty.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        let queues = self.queues.lock();
        queues.ready.is_empty() && queues.run.is_empty()
    }

    /// Number of queued processes as `(ready, run)`.
    #[must_use]
    pub fn queued(&self) -> (usize, usize) {
        let queues = self.queues.lock();
        (queues.ready.len(), queues.run.len())
    }

    /// Priorities currently queued, ready queue first, each front to back.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(QueueKind, Priority)> {
        let queues = self.queues.lock();
        queues
            .ready
            .iter()
            .map(|p| (QueueKind::Ready, p.priority()))
            .chain(queues.run.iter().map(|p| (QueueKind::Run, p.priority())))
            .collect()
    }
}

impl<P> core::fmt::Debug for Scheduler<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scheduler")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
