use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Pending item keyed by the amount required to reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueEntry<T> {
    pub item: T,
    pub key: f64,
}

impl<T: PartialEq> Eq for QueueEntry<T> {}

impl<T: PartialEq> Ord for QueueEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed so the std max-heap pops the smallest key first
        other.key.total_cmp(&self.key)
    }
}

impl<T: PartialEq> PartialOrd for QueueEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Binary min-heap used by the uniform-cost buy search.
///
/// There is no decrease-key: a relaxed token is pushed again and stale
/// entries are discarded by the caller when popped.
#[derive(Debug, Clone)]
pub struct PriceQueue<T> {
    heap: BinaryHeap<QueueEntry<T>>,
}

impl<T: PartialEq> PriceQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, item: T, key: f64) {
        self.heap.push(QueueEntry { item, key });
    }

    pub fn pop_min(&mut self) -> Option<QueueEntry<T>> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T: PartialEq> Default for PriceQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
