use simos_info::sched::MAX_QUEUE_SIZE;

/// Runtime sizing of the scheduler queues.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Entries each queue can hold.
    pub capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            capacity: MAX_QUEUE_SIZE,
        }
    }
}

impl SchedulerConfig {
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }
}
