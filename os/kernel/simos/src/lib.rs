//! # simos
//!
//! A simulated machine: paged virtual memory from [`simos_mm`], round-based
//! priority scheduling from [`simos_sched`] and process bookkeeping from
//! [`simos_proc`], tied together by [`Machine`].
//!
//! ```rust
//! use simos::Machine;
//! use simos_sched::Priority;
//!
//! let machine = Machine::default();
//! machine.spawn(Priority::new(2)).unwrap();
//!
//! let pcb = machine.schedule_next().unwrap();
//! let base = machine.allocate(300, &pcb).unwrap();
//! machine.write_byte(base, &pcb, 0x2a).unwrap();
//! assert_eq!(machine.read_byte(base, &pcb), Ok(0x2a));
//! assert!(machine.dump_state().contains("PID: 01"));
//! ```

pub mod config;
pub mod logger;
pub mod machine;
mod workload;

pub use config::{ConfigError, Invocation, MachineConfig};
pub use logger::StderrLogger;
pub use machine::{Machine, SpawnError};
pub use workload::WorkloadReport;
