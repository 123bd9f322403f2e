//! # Simulated Process Scheduler
//!
//! A round-based priority scheduler over two bounded queues. Processes enter
//! through [`Scheduler::admit_new`], are handed out by
//! [`Scheduler::schedule_next`] in priority order, and come back through
//! [`Scheduler::requeue_yielding`] when they yield before finishing. Once the
//! current round's ready queue is exhausted, everything that yielded during
//! the round becomes the next round.
//!
//! The scheduler never owns processes; it stores whatever handle the caller
//! passes in (typically an `Arc` of the process descriptor) and only needs
//! its [`Priority`] through the [`Prioritized`] trait.
//!
//! ```rust
//! use simos_sched::{Priority, Scheduler, SchedulerConfig};
//!
//! let sched = Scheduler::new(SchedulerConfig::with_capacity(4));
//! sched.admit_new(Priority::new(1)).unwrap();
//! sched.admit_new(Priority::new(5)).unwrap();
//!
//! let first = sched.schedule_next().unwrap();
//! assert_eq!(first, Priority::new(5));
//! sched.requeue_yielding(first).unwrap();
//!
//! assert_eq!(sched.schedule_next(), Some(Priority::new(1)));
//! // Ready queue is empty; the yielded process starts the next round.
//! assert_eq!(sched.schedule_next(), Some(Priority::new(5)));
//! assert!(sched.is_idle());
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

pub mod config;
pub mod error;
pub mod priority;
pub mod queue;
pub mod scheduler;

pub use config::SchedulerConfig;
pub use error::{QueueKind, SchedError};
pub use priority::{Prioritized, Priority};
pub use queue::PriorityQueue;
pub use scheduler::Scheduler;
