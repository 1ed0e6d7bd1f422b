//! Min-extraction priority queue ordered by a caller-supplied comparator.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// Pops the smallest item under `order` first.
pub struct Frontier<T> {
    heap: BinaryHeap<Ranked<T>>,
    order: Comparator<T>,
}

struct Ranked<T> {
    item: T,
    order: Comparator<T>,
}

impl<T> Ord for Ranked<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap
        (self.order)(&other.item, &self.item)
    }
}

impl<T> PartialOrd for Ranked<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Ranked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Ranked<T> {}

impl<T> Frontier<T> {
    pub fn new(order: Comparator<T>) -> Self {
        Self {
            heap: BinaryHeap::new(),
            order,
        }
    }

    pub fn with_capacity(order: Comparator<T>, capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            order,
        }
    }

    pub fn push(&mut self, item: T) {
        self.heap.push(Ranked {
            item,
            order: self.order,
        });
    }

    pub fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|ranked| ranked.item)
    }

    pub fn peek(&self) -> Option<&T> {
        self.heap.peek().map(|ranked| &ranked.item)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
