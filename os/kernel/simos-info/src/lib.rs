//! # Simulator Configuration
//!
//! Shared constants and identity types for the simulated kernel. Every other
//! crate in the workspace takes its geometry from here so the memory manager,
//! the scheduler and the process table never disagree about sizes.
//!
//! ## Virtual Address Layout
//!
//! A virtual address is [`ADDRESS_SIZE`] bits wide and splits into three
//! fields, from most to least significant:
//!
//! ```text
//!  19           15 14           10 9                     0
//! ┌───────────────┬───────────────┬───────────────────────┐
//! │  first level  │ second level  │        offset         │
//! │ (SEGMENT_LEN) │  (PAGE_LEN)   │     (OFFSET_LEN)      │
//! └───────────────┴───────────────┴───────────────────────┘
//! ```
//!
//! * The **first level** selects a slot in the per-process segment table.
//! * The **second level** selects a slot in that segment's page table.
//! * The **offset** addresses a byte within the mapped frame.
//!
//! ## Modules
//!
//! * [`memory`]: address geometry and RAM size.
//! * [`sched`]: scheduler queue capacity.
//! * [`pid`]: process identifiers.

#![cfg_attr(not(any(test, doctest)), no_std)]

pub mod memory;
pub mod pid;
pub mod sched;

pub use pid::Pid;
