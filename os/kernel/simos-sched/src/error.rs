use core::fmt;

/// Which of the two scheduler queues an operation touched.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum QueueKind {
    /// Processes waiting for their first dispatch in the current round.
    Ready,
    /// Processes that yielded and wait for the next round.
    Run,
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ready => "ready",
            Self::Run => "run",
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedError {
    #[error("{queue} queue is full ({capacity} entries)")]
    QueueFull { queue: QueueKind, capacity: usize },
}
