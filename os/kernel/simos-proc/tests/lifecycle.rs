use simos_info::memory::PAGE_SIZE;
use simos_mm::{MemoryConfig, MemoryManager, VirtAddr};
use simos_proc::{Pcb, ProcessTable};
use simos_sched::{Priority, Scheduler, SchedulerConfig};
use std::sync::Arc;
use std::thread;

#[test]
fn processes_rotate_through_rounds_while_using_memory() {
    let mm = MemoryManager::new(MemoryConfig::with_frames(32).unwrap());
    let sched: Scheduler<Arc<Pcb>> = Scheduler::default();
    let table = ProcessTable::new();

    for priority in [1, 4, 2] {
        sched.admit_new(table.spawn(Priority::new(priority)).unwrap()).unwrap();
    }

    let mut order = Vec::new();
    for round in 0..3_u8 {
        for _ in 0..3 {
            let pcb = sched.schedule_next().unwrap();
            order.push(pcb.priority().as_u32());

            let base = mm.allocate(PAGE_SIZE + 1, &pcb).unwrap();
            mm.write_byte(base, &pcb, round).unwrap();
            assert_eq!(mm.read_byte(base, &pcb), Ok(round));
            sched.requeue_yielding(pcb).unwrap();
        }
    }
    assert_eq!(order, [4, 2, 1, 4, 2, 1, 4, 2, 1]);
    // Three processes, three rounds, two frames each time.
    assert_eq!(mm.free_frames(), 32 - 18);
}

#[test]
fn terminated_processes_leave_no_frames_behind() {
    let mm = MemoryManager::new(MemoryConfig::with_frames(8).unwrap());
    let table = ProcessTable::new();
    let a = table.spawn(Priority::new(1)).unwrap();
    let b = table.spawn(Priority::new(1)).unwrap();

    let in_a = mm.allocate(3 * PAGE_SIZE, &a).unwrap();
    let in_b = mm.allocate(PAGE_SIZE, &b).unwrap();
    mm.write_byte(in_b, &b, 0x5a).unwrap();

    assert_eq!(table.terminate(a.pid(), &mm), Ok(3));
    assert!(mm.frames_owned_by(a.pid()).is_empty());
    assert!(mm.read_byte(in_a, &a).is_err(), "stale handle must not translate");
    assert_eq!(mm.read_byte(in_b, &b), Ok(0x5a));

    // The freed frames serve the next process.
    let c = table.spawn(Priority::new(1)).unwrap();
    mm.allocate(4 * PAGE_SIZE, &c).unwrap();
    assert_eq!(mm.free_frames(), 3);
    assert_eq!(table.pids(), [b.pid(), c.pid()]);
}

#[test]
fn processes_cannot_see_each_others_memory() {
    let mm = MemoryManager::new(MemoryConfig::with_frames(8).unwrap());
    let table = ProcessTable::new();
    let a = table.spawn(Priority::LOWEST).unwrap();
    let b = table.spawn(Priority::LOWEST).unwrap();

    let va = mm.allocate(10, &a).unwrap();
    assert_eq!(va, VirtAddr::new(PAGE_SIZE));
    mm.write_byte(va, &a, 1).unwrap();

    // Same virtual address in b is unmapped until b allocates its own.
    assert!(mm.read_byte(va, &b).is_err());
    assert_eq!(mm.allocate(10, &b), Ok(va));
    assert_eq!(mm.read_byte(va, &b), Ok(0));
    assert_ne!(mm.translate(va, &a), mm.translate(va, &b));
}

#[test]
fn spawning_from_many_threads_yields_unique_pids() {
    let table = Arc::new(ProcessTable::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                (0..25)
                    .map(|_| table.spawn(Priority::LOWEST).unwrap().pid())
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let mut all: Vec<_> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
    all.sort_unstable();
    all.dedup();
    assert_eq!(all.len(), 100);
    assert_eq!(table.pids(), all);
}

#[test]
fn scheduler_capacity_bounds_admission() {
    let sched: Scheduler<Arc<Pcb>> = Scheduler::new(SchedulerConfig::with_capacity(1));
    let table = ProcessTable::new();
    sched.admit_new(table.spawn(Priority::LOWEST).unwrap()).unwrap();
    assert!(sched.admit_new(table.spawn(Priority::LOWEST).unwrap()).is_err());
    // The rejected process is still alive in the table.
    assert_eq!(table.len(), 2);
}
