use crate::error::RingError;
use crate::invariants::{
    debug_assert_bounded_count, debug_assert_resize_fits, debug_assert_ring_consistent,
};
use crate::message::Message;

/// A growable circular buffer of owned [`Message`]s.
///
/// Not thread-safe on its own — every public method here assumes the
/// caller already holds the [`Queue`](crate::Queue)'s mutex. One slot is
/// always left empty so `count == capacity` (full) is distinguishable
/// from `count == 0` (empty) without a separate flag.
pub struct Ring {
    slots: Vec<Option<Message>>,
    head: usize,
    tail: usize,
    count: usize,
}

impl Ring {
    /// Creates a ring with the given allocated capacity (usable slots + 1).
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Current number of allocated slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of messages currently held.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// `count == capacity - 1`: no more slots can be used without growing.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.count == self.capacity() - 1
    }

    /// `count == 0`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Fill ratio as a percentage: `count * 100 / (capacity - 1)`.
    ///
    /// Defined as `0` when `capacity <= 1` to avoid division by zero.
    #[must_use]
    pub fn fill_percent(&self) -> u32 {
        let usable = self.capacity().saturating_sub(1);
        if usable == 0 {
            0
        } else {
            ((self.count as u64 * 100) / usable as u64) as u32
        }
    }

    /// Places `msg` at `head` and advances it.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::Full`] if `count == capacity - 1`; the caller
    /// should treat this as a dropped message, not store anything.
    pub fn push(&mut self, msg: Message) -> Result<(), RingError> {
        if self.is_full() {
            return Err(RingError::Full {
                capacity: self.capacity(),
            });
        }

        // Defensive: under the invariants this slot is always `None`. If it
        // somehow isn't, drop the stale message rather than leak it.
        if self.slots[self.head].take().is_some() {
            tracing::debug!(index = self.head, "overwriting non-empty ring slot");
        }
        self.slots[self.head] = Some(msg);
        self.head = (self.head + 1) % self.capacity();
        self.count += 1;

        debug_assert_bounded_count!(self.count, self.capacity());
        debug_assert_ring_consistent!(self.tail, self.count, self.capacity(), self.head);
        Ok(())
    }

    /// Takes the message at `tail` and advances it. Returns `None` if empty.
    pub fn pop(&mut self) -> Option<Message> {
        if self.is_empty() {
            return None;
        }
        let msg = self.slots[self.tail].take();
        self.tail = (self.tail + 1) % self.capacity();
        self.count -= 1;
        debug_assert_ring_consistent!(self.tail, self.count, self.capacity(), self.head);
        msg
    }

    /// Grows the ring to `new_capacity`, repacking live messages to
    /// `[0, count)` in pop order so FIFO order survives regardless of the
    /// old head/tail wrap position.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::ResizeTooSmall`] if `new_capacity` cannot hold
    /// every live message plus the reserved slot; the ring is left
    /// unchanged in that case.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), RingError> {
        debug_assert_resize_fits!(new_capacity, self.count);
        if new_capacity < self.count + 1 {
            return Err(RingError::ResizeTooSmall {
                target: new_capacity,
                count: self.count,
            });
        }

        let mut new_slots = Vec::with_capacity(new_capacity);
        new_slots.resize_with(new_capacity, || None);

        let mut idx = self.tail;
        for new_slot in new_slots.iter_mut().take(self.count) {
            *new_slot = self.slots[idx].take();
            idx = (idx + 1) % self.slots.len();
        }

        self.slots = new_slots;
        self.tail = 0;
        self.head = self.count;
        Ok(())
    }

    /// Drains every remaining message, releasing them. Used by
    /// [`Queue::destroy`](crate::Queue::destroy).
    pub fn drain_all(&mut self) -> usize {
        let mut freed = 0;
        while self.pop().is_some() {
            freed += 1;
        }
        freed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_preserves_fifo_order() {
        let mut ring = Ring::new(5);
        ring.push(Message::from("a")).unwrap();
        ring.push(Message::from("b")).unwrap();
        ring.push(Message::from("c")).unwrap();

        assert_eq!(ring.pop().unwrap().as_bytes(), b"a");
        assert_eq!(ring.pop().unwrap().as_bytes(), b"b");
        assert_eq!(ring.pop().unwrap().as_bytes(), b"c");
        assert!(ring.pop().is_none());
    }

    #[test]
    fn push_fails_when_full_one_slot_reserved() {
        let mut ring = Ring::new(4); // usable = 3
        ring.push(Message::from("a")).unwrap();
        ring.push(Message::from("b")).unwrap();
        ring.push(Message::from("c")).unwrap();
        assert!(ring.is_full());
        assert!(matches!(
            ring.push(Message::from("d")),
            Err(RingError::Full { capacity: 4 })
        ));
    }

    #[test]
    fn resize_preserves_order_across_a_wrapped_ring() {
        let mut ring = Ring::new(4); // usable = 3
        ring.push(Message::from("a")).unwrap();
        ring.push(Message::from("b")).unwrap();
        ring.push(Message::from("c")).unwrap();
        // Pop two, push two more so head/tail wrap around the backing vec.
        assert_eq!(ring.pop().unwrap().as_bytes(), b"a");
        assert_eq!(ring.pop().unwrap().as_bytes(), b"b");
        ring.push(Message::from("d")).unwrap();
        ring.push(Message::from("e")).unwrap();

        ring.resize(8).unwrap();
        assert_eq!(ring.capacity(), 8);
        assert_eq!(ring.count(), 3);
        assert_eq!(ring.pop().unwrap().as_bytes(), b"c");
        assert_eq!(ring.pop().unwrap().as_bytes(), b"d");
        assert_eq!(ring.pop().unwrap().as_bytes(), b"e");
    }

    #[test]
    fn resize_rejects_target_too_small_for_live_messages() {
        let mut ring = Ring::new(8);
        for c in "abcde".chars() {
            ring.push(Message::from(c.to_string().as_str())).unwrap();
        }
        assert!(matches!(
            ring.resize(4),
            Err(RingError::ResizeTooSmall {
                target: 4,
                count: 5
            })
        ));
        // Unchanged on failure.
        assert_eq!(ring.capacity(), 8);
        assert_eq!(ring.count(), 5);
    }

    #[test]
    fn fill_percent_is_zero_for_degenerate_capacity() {
        let ring = Ring::new(1);
        assert_eq!(ring.fill_percent(), 0);
    }

    #[test]
    fn drain_all_returns_and_empties() {
        let mut ring = Ring::new(4);
        ring.push(Message::from("a")).unwrap();
        ring.push(Message::from("b")).unwrap();
        assert_eq!(ring.drain_all(), 2);
        assert!(ring.is_empty());
    }

    proptest::proptest! {
        /// A ring that is only ever pushed (up to its capacity) and popped
        /// one-for-one, with occasional growth resizes interleaved, returns
        /// messages in the exact order they were pushed.
        #[test]
        fn fifo_survives_interleaved_push_pop_and_resize(
            ops in proptest::collection::vec(0u8..=2, 1..200),
        ) {
            let mut ring = Ring::new(4);
            let mut model: std::collections::VecDeque<Message> = std::collections::VecDeque::new();
            let mut next_id = 0u64;

            for op in ops {
                match op {
                    0 => {
                        let msg = Message::from(next_id.to_string().as_str());
                        next_id += 1;
                        if ring.push(msg.clone()).is_ok() {
                            model.push_back(msg);
                        }
                    }
                    1 => {
                        let popped = ring.pop();
                        let expected = model.pop_front();
                        proptest::prop_assert_eq!(popped, expected);
                    }
                    _ => {
                        let target = ring.capacity() * 2;
                        let _ = ring.resize(target);
                    }
                }
                proptest::prop_assert!(ring.count() <= ring.capacity() - 1);
            }
        }
    }
}
