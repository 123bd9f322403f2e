use simos_sync::RwSpinLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn many_readers_share_the_lock() {
    let l = RwSpinLock::new(5u32);
    let r1 = l.read();
    let r2 = l.try_read().expect("second reader");
    assert_eq!(*r1 + *r2, 10);
    assert!(l.try_write().is_none(), "writer must wait for readers");
    drop(r1);
    assert!(l.try_write().is_none());
    drop(r2);
    assert!(l.try_write().is_some());
}

#[test]
fn writer_excludes_readers() {
    let l = RwSpinLock::new(Vec::<u8>::new());
    let mut w = l.write();
    w.push(1);
    assert!(l.try_read().is_none());
    assert!(l.try_write().is_none());
    drop(w);
    assert_eq!(l.read().as_slice(), &[1]);
}

#[test]
fn failed_read_attempt_leaves_no_trace() {
    let l = RwSpinLock::new(0u8);
    let w = l.write();
    for _ in 0..4 {
        assert!(l.try_read().is_none());
    }
    drop(w);
    // Stale reader counts would block the next writer forever.
    assert!(l.try_write().is_some());
}

#[test]
fn writers_and_readers_under_contention() {
    let writers = 4;
    let readers = 4;
    let iters = 1_000;

    let lock = Arc::new(RwSpinLock::new((0usize, 0usize)));
    let writing = Arc::new(AtomicUsize::new(0));
    let start = Arc::new(Barrier::new(writers + readers));

    let mut handles = Vec::new();
    for _ in 0..writers {
        let lock = Arc::clone(&lock);
        let writing = Arc::clone(&writing);
        let start = Arc::clone(&start);
        handles.push(thread::spawn(move || {
            start.wait();
            for _ in 0..iters {
                let mut g = lock.write();
                assert_eq!(writing.fetch_add(1, Ordering::SeqCst), 0);
                g.0 += 1;
                g.1 += 1;
                writing.fetch_sub(1, Ordering::SeqCst);
            }
        }));
    }
    for _ in 0..readers {
        let lock = Arc::clone(&lock);
        let writing = Arc::clone(&writing);
        let start = Arc::clone(&start);
        handles.push(thread::spawn(move || {
            start.wait();
            for _ in 0..iters {
                let g = lock.read();
                assert_eq!(writing.load(Ordering::SeqCst), 0);
                assert_eq!(g.0, g.1, "reader saw a torn update");
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(lock.read().0, writers * iters);
}

#[test]
fn failed_try_write_keeps_the_writer_exclusive() {
    let l = RwSpinLock::new(0u8);
    let w = l.write();
    assert!(l.try_write().is_none());
    assert!(l.try_read().is_none(), "reader got in beside a writer");
    assert!(l.try_write().is_none(), "second writer got in");
    drop(w);
    assert!(l.try_read().is_some());
}

#[test]
fn failed_try_write_against_readers_keeps_them_shared() {
    let l = RwSpinLock::new(0u8);
    let r = l.read();
    assert!(l.try_write().is_none());
    assert!(l.try_write().is_none());
    assert!(l.try_read().is_some());
    drop(r);
    assert!(l.try_write().is_some());
}
