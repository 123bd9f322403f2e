//! # Simulated Processes
//!
//! Process control blocks and the table that owns them. A [`Pcb`] ties the
//! memory manager and the scheduler together: it carries the [`Pid`] and
//! [`AddressSpace`](simos_mm::AddressSpace) that [`simos_mm`] needs, and the
//! [`Priority`](simos_sched::Priority) that [`simos_sched`] orders by.
//!
//! [`Pid`]: simos_info::Pid

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

pub mod error;
pub mod pcb;
pub mod pid;
pub mod table;

pub use error::ProcError;
pub use pcb::Pcb;
pub use pid::PidAllocator;
pub use table::ProcessTable;
