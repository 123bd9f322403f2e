//! # Bounded Priority Queue
//!
//! A ring buffer of `capacity + 1` slots that keeps its entries sorted by
//! [`Priority`] at all times. The spare slot tells a full queue (`tail` one
//! behind `head`) apart from an empty one (`tail == head`).
//!
//! ```text
//!        head                 tail
//!         ▼                    ▼
//!  ┌────┬────┬────┬────┬────┬────┐
//!  │    │ P9 │ P5 │ P5 │ P1 │    │
//!  └────┴────┴────┴────┴────┴────┘
//! ```
//!
//! Insertion walks from the head to the first entry of strictly lower
//! priority and shifts the rest one slot towards the tail, so equal
//! priorities keep their arrival order. The queues are small; a heap would
//! not pay for itself.

use crate::priority::Prioritized;
use alloc::boxed::Box;
use alloc::vec::Vec;

pub struct PriorityQueue<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
}

impl<T: Prioritized> PriorityQueue<T> {
    /// An empty queue holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let slots: Vec<Option<T>> = (0..=capacity).map(|_| None).collect();
        Self {
            slots: slots.into_boxed_slice(),
            head: 0,
            tail: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.wrap(self.tail + 1) == self.head
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        (self.tail + self.slots.len() - self.head) % self.slots.len()
    }

    #[inline]
    fn wrap(&self, index: usize) -> usize {
        index % self.slots.len()
    }

    /// Inserts `entry` behind every entry of equal or higher priority.
    ///
    /// # Errors
    /// Hands `entry` back if the queue is full.
    pub fn push(&mut self, entry: T) -> Result<(), T> {
        if self.is_full() {
            return Err(entry);
        }

        let priority = entry.priority();
        let mut i = self.head;
        while i != self.tail
            && self.slots[i]
                .as_ref()
                .is_some_and(|queued| !priority.precedes(queued.priority()))
        {
            i = self.wrap(i + 1);
        }

        // Carry the new entry down the queue, swapping as we go.
        let mut carried = Some(entry);
        while i != self.tail {
            core::mem::swap(&mut self.slots[i], &mut carried);
            i = self.wrap(i + 1);
        }
        self.slots[self.tail] = carried;
        self.tail = self.wrap(self.tail + 1);
        Ok(())
    }

    /// Removes the highest-priority entry.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let entry = self.slots[self.head].take();
        self.head = self.wrap(self.head + 1);
        entry
    }

    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    /// Entries from front to back.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len()).filter_map(move |k| self.slots[self.wrap(self.head + k)].as_ref())
    }
}

impl<T> core::fmt::Debug for PriorityQueue<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("slots", &self.slots.len())
            .finish()
    }
}
