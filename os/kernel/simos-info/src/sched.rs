//! # Scheduler Limits

/// Default number of processes a single scheduler queue can hold.
pub const MAX_QUEUE_SIZE: usize = 10;

/// Largest queue capacity a scheduler may be configured with.
pub const QUEUE_CAPACITY_LIMIT: usize = 1 << 16;

const _: () = {
    assert!(MAX_QUEUE_SIZE > 0);
    assert!(MAX_QUEUE_SIZE <= QUEUE_CAPACITY_LIMIT);
};
