//! # Sequence-addressed reorder buffer.
//!
//! Reconciles out-of-order settlement with in-order release.
//!
//! ```text
//!  head = 5
//!   │
//!   ▼
//! [ None | Some(r6) | Some(r7) | None ]     slot 5 still running
//!
//! fill(5, r5)  →  [ Some(r5) | Some(r6) | Some(r7) | None ]
//! pop_ready ×3 →  r5, r6, r7                head = 8
//! ```
//!
//! ## Rules
//! - Slots are reserved in dispatch order and numbered monotonically.
//! - `fill` is O(1): the slot index is `slot - head`.
//! - `pop_ready` only ever releases the head; a pending head blocks everything behind it.

use std::collections::VecDeque;

/// Ordered slots awaiting in-order release.
#[derive(Debug)]
pub(crate) struct ReorderBuffer<V> {
    /// Slot number of `slots[0]`.
    head: u64,
    slots: VecDeque<Option<V>>,
    /// Filled slots not yet released.
    settled: usize,
}

impl<V> ReorderBuffer<V> {
    pub(crate) fn new() -> Self {
        Self {
            head: 0,
            slots: VecDeque::new(),
            settled: 0,
        }
    }

    /// Appends a pending slot and returns its number.
    pub(crate) fn reserve(&mut self) -> u64 {
        let slot = self.head + self.slots.len() as u64;
        self.slots.push_back(None);
        slot
    }

    /// Stores a settled value in a reserved slot.
    ///
    /// Returns the value back if the slot was never reserved, was already
    /// released, or is already filled.
    pub(crate) fn fill(&mut self, slot: u64, value: V) -> Result<(), V> {
        let Some(idx) = slot.checked_sub(self.head) else {
            return Err(value);
        };
        let Ok(idx) = usize::try_from(idx) else {
            return Err(value);
        };
        match self.slots.get_mut(idx) {
            Some(entry) if entry.is_none() => {
                *entry = Some(value);
                self.settled += 1;
                Ok(())
            }
            _ => Err(value),
        }
    }

    /// Releases the head slot if it has settled.
    pub(crate) fn pop_ready(&mut self) -> Option<V> {
        if !matches!(self.slots.front(), Some(Some(_))) {
            return None;
        }
        let value = self.slots.pop_front().flatten()?;
        self.head += 1;
        self.settled -= 1;
        Some(value)
    }

    /// Settled values withheld behind a pending head.
    pub(crate) fn settled(&self) -> usize {
        self.settled
    }

    /// Reserved slots not yet released (pending or settled).
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_order_fills_release_immediately() {
        let mut buf = ReorderBuffer::new();
        let a = buf.reserve();
        let b = buf.reserve();
        assert_eq!((a, b), (0, 1));

        buf.fill(a, "a").unwrap();
        assert_eq!(buf.pop_ready(), Some("a"));
        assert_eq!(buf.pop_ready(), None);

        buf.fill(b, "b").unwrap();
        assert_eq!(buf.pop_ready(), Some("b"));
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn pending_head_blocks_later_slots() {
        let mut buf = ReorderBuffer::new();
        let s0 = buf.reserve();
        let s1 = buf.reserve();
        let s2 = buf.reserve();

        buf.fill(s2, 2).unwrap();
        buf.fill(s1, 1).unwrap();
        assert_eq!(buf.pop_ready(), None);
        assert_eq!(buf.settled(), 2);

        buf.fill(s0, 0).unwrap();
        let drained: Vec<_> = std::iter::from_fn(|| buf.pop_ready()).collect();
        assert_eq!(drained, vec![0, 1, 2]);
        assert_eq!(buf.settled(), 0);
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn slot_numbers_keep_growing_after_release() {
        let mut buf = ReorderBuffer::new();
        let s0 = buf.reserve();
        buf.fill(s0, ()).unwrap();
        buf.pop_ready();

        assert_eq!(buf.reserve(), 1);
        assert_eq!(buf.reserve(), 2);
    }

    #[test]
    fn invalid_fills_hand_the_value_back() {
        let mut buf = ReorderBuffer::new();
        let s0 = buf.reserve();

        assert_eq!(buf.fill(7, "unreserved"), Err("unreserved"));

        buf.fill(s0, "first").unwrap();
        assert_eq!(buf.fill(s0, "again"), Err("again"));

        buf.pop_ready();
        assert_eq!(buf.fill(s0, "released"), Err("released"));
    }
}
