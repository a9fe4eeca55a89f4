//! Binary-heap min-queue with first-in-first-out order among equal keys

use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Entry<T> {
    key: u64,
    sequence: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.sequence == other.sequence
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap yields the smallest key, oldest first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// O(log n) push/pop. There is no decrease-key: callers push again and skip
/// stale entries when they pop.
pub struct MinQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    next_sequence: u64,
}

impl<T> MinQueue<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    pub fn push(&mut self, key: u64, item: T) {
        self.heap.push(Entry {
            key,
            sequence: self.next_sequence,
            item,
        });
        self.next_sequence += 1;
    }

    pub fn pop(&mut self) -> Option<(u64, T)> {
        self.heap.pop().map(|entry| (entry.key, entry.item))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for MinQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
