//! # Simulator synchronization primitives
//!
//! Spinning locks for the simulated kernel. Both locks are `no_std` and
//! hand out RAII guards; dropping the guard releases the lock.
//!
//! * [`SpinLock`]: exclusive lock, used for the frame table and the
//!   scheduler queues.
//! * [`RwSpinLock`]: reader/writer lock, used for per-process address
//!   spaces so byte accesses can translate concurrently while allocation
//!   and release get exclusive access.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod rw_spin_lock;
mod spin_lock;

pub use rw_spin_lock::{RwSpinLock, RwSpinReadGuard, RwSpinWriteGuard};
pub use spin_lock::{SpinLock, SpinLockGuard};
