use alloc::sync::Arc;
use core::fmt;

/// Scheduling priority of a process. A larger value runs earlier.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Priority(u32);

impl Priority {
    pub const LOWEST: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn new(v: u32) -> Self {
        Self(v)
    }

    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Whether `self` must be dispatched ahead of `other`.
    #[inline]
    #[must_use]
    pub const fn precedes(self, other: Self) -> bool {
        self.0 > other.0
    }
}

impl fmt::Debug for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Priority({})", self.0)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for Priority {
    #[inline]
    fn from(v: u32) -> Self {
        Self::new(v)
    }
}

/// Anything the scheduler can order.
pub trait Prioritized {
    fn priority(&self) -> Priority;
}

impl<T: Prioritized + ?Sized> Prioritized for &T {
    fn priority(&self) -> Priority {
        (**self).priority()
    }
}

impl<T: Prioritized + ?Sized> Prioritized for Arc<T> {
    fn priority(&self) -> Priority {
        (**self).priority()
    }
}

impl Prioritized for Priority {
    fn priority(&self) -> Priority {
        *self
    }
}
