use core::{
    cell::UnsafeCell,
    fmt,
    hint::spin_loop,
    ops::{Deref, DerefMut},
    sync::atomic::{AtomicUsize, Ordering},
};

/// Writer bit; the remaining bits count active readers.
const WRITER: usize = 1;
/// One reader.
const READER: usize = 2;

/// Reader/writer spin lock.
///
/// Any number of readers may hold the lock at once, or exactly one writer.
/// Readers do not queue behind a waiting writer, so a writer can starve
/// under a constant stream of readers. In the simulator every critical
/// section is a bounded table walk, which keeps that window short.
pub struct RwSpinLock<T> {
    /// `WRITER` bit plus `READER` times the number of readers.
    state: AtomicUsize,
    inner: UnsafeCell<T>,
}

// Safety: readers share &T across threads (needs Sync), the writer moves
// &mut T to whichever thread holds the lock (needs Send).
unsafe impl<T: Send + Sync> Sync for RwSpinLock<T> {}

impl<T> RwSpinLock<T> {
    pub const fn new(inner: T) -> Self {
        Self {
            state: AtomicUsize::new(0),
            inner: UnsafeCell::new(inner),
        }
    }

    /// Try once to take a shared guard.
    pub fn try_read(&self) -> Option<RwSpinReadGuard<'_, T>> {
        let prev = self.state.fetch_add(READER, Ordering::Acquire);
        if prev & WRITER == 0 {
            Some(RwSpinReadGuard { lock: self })
        } else {
            // A writer holds it; take our reader count back.
            self.state.fetch_sub(READER, Ordering::Release);
            None
        }
    }

    /// Spin until a shared guard is available.
    pub fn read(&self) -> RwSpinReadGuard<'_, T> {
        loop {
            if let Some(guard) = self.try_read() {
                return guard;
            }
            while self.state.load(Ordering::Relaxed) & WRITER != 0 {
                spin_loop();
            }
        }
    }

    /// Try once to take the exclusive guard.
    pub fn try_write(&self) -> Option<RwSpinWriteGuard<'_, T>> {
        if self
            .state
            .compare_exchange(0, WRITER, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Some(RwSpinWriteGuard { lock: self })
        } else {
            None
        }
    }

    /// Spin until no reader or writer is left, then take the exclusive guard.
    pub fn write(&self) -> RwSpinWriteGuard<'_, T> {
        loop {
            if let Some(guard) = self.try_write() {
                return guard;
            }
            while self.state.load(Ordering::Relaxed) != 0 {
                spin_loop();
            }
        }
    }

    /// Mutable access when you have `&mut self` (no contention possible).
    #[inline]
    pub const fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut()
    }

    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<T: Default> Default for RwSpinLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for RwSpinLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.load(Ordering::Relaxed);
        f.debug_struct("RwSpinLock")
            .field("writer", &(state & WRITER != 0))
            .field("readers", &(state / READER))
            .finish_non_exhaustive()
    }
}

pub struct RwSpinReadGuard<'a, T> {
    lock: &'a RwSpinLock<T>,
}

impl<T> Deref for RwSpinReadGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        // Safety: no writer can exist while a reader count is held.
        unsafe { &*self.lock.inner.get() }
    }
}

impl<T> Drop for RwSpinReadGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.state.fetch_sub(READER, Ordering::Release);
    }
}

pub struct RwSpinWriteGuard<'a, T> {
    lock: &'a RwSpinLock<T>,
}

impl<T> Deref for RwSpinWriteGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        // Safety: the writer bit excludes every other guard.
        unsafe { &*self.lock.inner.get() }
    }
}

impl<T> DerefMut for RwSpinWriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // Safety: the writer bit excludes every other guard.
        unsafe { &mut *self.lock.inner.get() }
    }
}

impl<T> Drop for RwSpinWriteGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.state.fetch_and(!WRITER, Ordering::Release);
    }
}
