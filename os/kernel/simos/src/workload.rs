//! The scripted workload behind [`Machine::run_workers`].

use crate::machine::Machine;
use log::{error, trace, warn};
use simos_info::memory::PAGE_SIZE;
use simos_info::Pid;
use simos_mm::VirtAddr;
use simos_proc::Pcb;
use std::collections::HashMap;
use std::ops::AddAssign;
use std::sync::Mutex;
use std::thread;

/// What a workload run did.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct WorkloadReport {
    /// Processes handed out by the scheduler.
    pub dispatches: usize,
    pub allocations: usize,
    /// Allocations refused by the memory manager.
    pub failed_allocations: usize,
    pub releases: usize,
    /// Bytes that did not read back as written. Always zero unless
    /// processes share frames.
    pub mismatches: usize,
    /// Processes that used up their bursts or could not be requeued.
    pub finished: usize,
    /// Worker threads that panicked.
    pub crashed_workers: usize,
}

impl AddAssign for WorkloadReport {
    fn add_assign(&mut self, rhs: Self) {
        self.dispatches += rhs.dispatches;
        self.allocations += rhs.allocations;
        self.failed_allocations += rhs.failed_allocations;
        self.releases += rhs.releases;
        self.mismatches += rhs.mismatches;
        self.finished += rhs.finished;
        self.crashed_workers += rhs.crashed_workers;
    }
}

pub(crate) fn run(machine: &Machine, workers: usize, bursts: u32) -> WorkloadReport {
    let dispatched: Mutex<HashMap<Pid, u32>> = Mutex::new(HashMap::new());

    thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| s.spawn(|| worker(machine, &dispatched, bursts)))
            .collect();
        merge(handles.into_iter().map(thread::ScopedJoinHandle::join))
    })
}

/// Sums the worker reports. A worker that panicked is logged and counted;
/// the process it held stays in the process table.
fn merge<I>(results: I) -> WorkloadReport
where
    I: IntoIterator<Item = thread::Result<WorkloadReport>>,
{
    let mut total = WorkloadReport::default();
    for result in results {
        match result {
            Ok(report) => total += report,
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .copied()
                    .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                    .unwrap_or("unknown panic");
                error!("worker panicked: {reason}");
                total.crashed_workers += 1;
            }
        }
    }
    total
}

fn worker(machine: &Machine, dispatched: &Mutex<HashMap<Pid, u32>>, bursts: u32) -> WorkloadReport {
    let mut report = WorkloadReport::default();
    while let Some(pcb) = machine.schedule_next() {
        report.dispatches += 1;
        let burst = {
            let Ok(mut dispatched) = dispatched.lock() else {
                warn!("dispatch counter poisoned, stopping worker");
                break;
            };
            let count = dispatched.entry(pcb.pid()).or_insert(0);
            *count += 1;
            *count
        };

        run_burst(machine, &pcb, burst, &mut report);

        if burst >= bursts {
            trace!("pid {}: finished after {burst} bursts", pcb.pid());
            report.finished += 1;
        } else if machine.requeue_yielding(pcb).is_err() {
            report.finished += 1;
        }
    }
    report
}

fn run_burst(machine: &Machine, pcb: &Pcb, burst: u32, report: &mut WorkloadReport) {
    let pid = pcb.pid().as_u32();
    let size = burst_size(pid, burst);
    let base = match machine.allocate(size, pcb) {
        Ok(base) => base,
        Err(e) => {
            trace!("pid {pid}: burst {burst}: {e}");
            report.failed_allocations += 1;
            return;
        }
    };
    report.allocations += 1;

    let marker = marker(pid, burst);
    let last = VirtAddr::new(base.as_u32() + size - 1);
    for va in [base, last] {
        let written = machine.write_byte(va, pcb, marker);
        if written.is_err() || machine.read_byte(va, pcb) != Ok(marker) {
            warn!("pid {pid}: byte at {va} did not read back");
            report.mismatches += 1;
        }
    }

    if burst.is_multiple_of(2) && machine.release(base, pcb).is_ok() {
        report.releases += 1;
    }
}

/// Between one byte and three pages, varying with pid and burst.
const fn burst_size(pid: u32, burst: u32) -> u32 {
    (pid.wrapping_mul(97).wrapping_add(burst.wrapping_mul(389))) % (3 * PAGE_SIZE) + 1
}

/// Never zero, so markers show up in the state dump.
#[allow(clippy::cast_possible_truncation)]
const fn marker(pid: u32, burst: u32) -> u8 {
    ((pid << 4) ^ burst) as u8 | 1
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn burst_sizes_stay_within_three_pages() {
        for pid in 1..20 {
            for burst in 1..20 {
                let size = burst_size(pid, burst);
                assert!((1..=3 * PAGE_SIZE).contains(&size));
            }
        }
    }

    #[test]
    fn panicked_workers_are_counted_not_hidden() {
        let ok = WorkloadReport {
            dispatches: 3,
            ..WorkloadReport::default()
        };
        let total = merge([
            Ok(ok),
            Err(Box::new("burst failed") as Box<dyn std::any::Any + Send>),
            Ok(ok),
        ]);
        assert_eq!(total.dispatches, 6);
        assert_eq!(total.crashed_workers, 1);
    }

    #[test]
    fn markers_are_never_zero() {
        assert!((0..64).all(|pid| (0..64).all(|burst| marker(pid, burst) != 0)));
    }
}
