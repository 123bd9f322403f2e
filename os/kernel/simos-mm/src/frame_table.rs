//! # Frame Allocation Table
//!
//! One [`FrameInfo`] per physical frame. A frame with an owner is in use;
//! all frames handed out by a single allocation are chained through
//! [`FrameInfo::next`] in allocation order, so a region can be released
//! from its first frame alone.
//!
//! ```text
//!  frame:   0      1      2      3      4
//!        ┌──────┬──────┬──────┬──────┬──────┐
//!  owner │ P1   │ -    │ P1   │ P2   │ P1   │
//!  index │ 0    │      │ 1    │ 0    │ 2    │
//!  next  │ 2    │      │ 4    │ -    │ -    │
//!        └──────┴──────┴──────┴──────┴──────┘
//!          └──────────────┘└─────────────┘
//! ```
//!
//! The table is the only record of which frames are free.

use crate::address::FrameNumber;
use alloc::vec::Vec;
use log::trace;
use simos_info::Pid;

/// Allocation state of one physical frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameInfo {
    /// Owning process; `None` marks a free frame.
    pub owner: Option<Pid>,
    /// Position of the frame within its allocation, starting at zero.
    pub index: u32,
    /// The next frame of the same allocation.
    pub next: Option<FrameNumber>,
}

impl FrameInfo {
    pub const FREE: Self = Self {
        owner: None,
        index: 0,
        next: None,
    };

    #[inline]
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.owner.is_none()
    }

    /// Whether this frame starts an allocation of `pid`.
    #[inline]
    #[must_use]
    pub fn is_head_of(&self, pid: Pid) -> bool {
        self.owner == Some(pid) && self.index == 0
    }
}

pub struct FrameTable {
    entries: Vec<FrameInfo>,
}

impl FrameTable {
    /// Creates a table of `frames` free frames.
    #[must_use]
    pub fn new(frames: usize) -> Self {
        Self {
            entries: alloc::vec![FrameInfo::FREE; frames],
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, frame: FrameNumber) -> Option<&FrameInfo> {
        self.entries.get(frame.as_usize())
    }

    /// Whether at least `wanted` frames are free. Stops counting as soon as
    /// the answer is known.
    #[must_use]
    pub fn has_free(&self, wanted: usize) -> bool {
        wanted == 0
            || self
                .entries
                .iter()
                .filter(|e| e.is_free())
                .take(wanted)
                .count()
                == wanted
    }

    #[must_use]
    pub fn free_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_free()).count()
    }

    /// First free frame at or after `from`.
    fn next_free(&self, from: usize) -> Option<FrameNumber> {
        self.entries
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, e)| e.is_free())
            .map(|(i, _)| frame_number(i))
    }

    /// Takes `count` free frames for `owner` and chains them in allocation
    /// order.
    ///
    /// Frames are picked first-fit, each search resuming after the frame
    /// chosen before it. Either all `count` frames are claimed or, if not
    /// enough are free, none are and `None` is returned.
    pub fn claim(&mut self, owner: Pid, count: usize) -> Option<Vec<FrameNumber>> {
        if count == 0 || !self.has_free(count) {
            return None;
        }

        let mut chain = Vec::with_capacity(count);
        let mut cursor = 0;
        let mut prev: Option<FrameNumber> = None;
        for index in 0..count {
            let frame = self.next_free(cursor)?;
            self.entries[frame.as_usize()] = FrameInfo {
                owner: Some(owner),
                index: u32::try_from(index).unwrap_or(u32::MAX),
                next: None,
            };
            if let Some(prev) = prev {
                self.entries[prev.as_usize()].next = Some(frame);
            }
            trace!("frame {frame}: claimed by pid {owner} as #{index}");

            chain.push(frame);
            prev = Some(frame);
            cursor = frame.as_usize() + 1;
        }
        Some(chain)
    }

    /// Frees the chain starting at `head` and returns how many frames it held.
    ///
    /// Each link is read before its entry is reset. The walk stops at the
    /// first frame not owned by `owner`, so a damaged chain can never free
    /// another process's memory.
    pub fn release_chain(&mut self, head: FrameNumber, owner: Pid) -> usize {
        let mut count = 0;
        let mut cursor = Some(head);
        while let Some(frame) = cursor {
            let Some(entry) = self.entries.get_mut(frame.as_usize()) else {
                break;
            };
            if entry.owner != Some(owner) {
                break;
            }
            cursor = entry.next;
            *entry = FrameInfo::FREE;
            trace!("frame {frame}: released by pid {owner}");
            count += 1;
        }
        count
    }

    /// Frees every frame owned by `owner`, returning how many there were.
    pub fn release_owner(&mut self, owner: Pid) -> usize {
        let mut count = 0;
        for entry in self.entries.iter_mut().filter(|e| e.owner == Some(owner)) {
            *entry = FrameInfo::FREE;
            count += 1;
        }
        count
    }

    /// Occupied frames in increasing frame order.
    pub fn used(&self) -> impl Iterator<Item = (FrameNumber, &FrameInfo)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_free())
            .map(|(i, e)| (frame_number(i), e))
    }

    /// Frames owned by `owner` in increasing frame order.
    pub fn owned_by(&self, owner: Pid) -> impl Iterator<Item = FrameNumber> + '_ {
        self.used()
            .filter(move |(_, e)| e.owner == Some(owner))
            .map(|(f, _)| f)
    }
}

impl core::fmt::Debug for FrameTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameTable")
            .field("frames", &self.len())
            .field("free", &self.free_count())
            .finish()
    }
}

/// Table sizes are validated to fit `u32` when the manager is configured.
#[inline]
fn frame_number(index: usize) -> FrameNumber {
    FrameNumber::new(u32::try_from(index).unwrap_or(u32::MAX))
}
