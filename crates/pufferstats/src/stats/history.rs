//! Bounded history of recent episode results.

use std::collections::vec_deque::{self, VecDeque};

/// FIFO with a fixed capacity; pushing into a full queue evicts the oldest
/// entry.
#[derive(Clone, Debug)]
pub struct HistoryQueue<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> HistoryQueue<T> {
    /// Create an empty queue holding at most `capacity` items
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "HistoryQueue capacity must be > 0");
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append `value`, returning the evicted oldest value if the queue was full
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(value);
        evicted
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently pushed value
    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T: Clone> HistoryQueue<T> {
    /// Copy the contents, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl HistoryQueue<f64> {
    /// Mean of the stored values, `None` when empty
    pub fn mean(&self) -> Option<f64> {
        mean_of(self.items.iter().copied())
    }
}

impl HistoryQueue<u64> {
    /// Mean of the stored values, `None` when empty
    pub fn mean(&self) -> Option<f64> {
        mean_of(self.items.iter().map(|&v| v as f64))
    }
}

fn mean_of(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    Some(values.sum::<f64>() / n as f64)
}

impl<'a, T> IntoIterator for &'a HistoryQueue<T> {
    type Item = &'a T;
    type IntoIter = vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut queue = HistoryQueue::new(3);
        assert!(queue.is_empty());

        assert_eq!(queue.push(1), None);
        assert_eq!(queue.push(2), None);
        assert_eq!(queue.push(3), None);
        assert!(queue.is_full());
        assert_eq!(queue.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_evicts_oldest() {
        let mut queue = HistoryQueue::new(2);
        for i in 0..5 {
            queue.push(i);
        }

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.to_vec(), vec![3, 4]);
        assert_eq!(queue.latest(), Some(&4));
        assert_eq!(queue.push(5), Some(3));
    }

    #[test]
    fn test_iter_order() {
        let mut queue = HistoryQueue::new(4);
        for v in [0.5, 1.5, 2.5] {
            queue.push(v);
        }
        let sum: f64 = queue.iter().sum();
        assert_eq!(sum, 4.5);
        assert_eq!((&queue).into_iter().next(), Some(&0.5));
        assert_eq!(queue.mean(), Some(1.5));
    }

    #[test]
    fn test_mean_of_lengths() {
        let mut queue = HistoryQueue::<u64>::new(3);
        assert_eq!(queue.mean(), None);
        for l in [2, 4, 6, 8] {
            queue.push(l);
        }
        assert_eq!(queue.mean(), Some(6.0));
    }

    #[test]
    #[should_panic(expected = "capacity must be > 0")]
    fn test_zero_capacity_panics() {
        let _ = HistoryQueue::<u64>::new(0);
    }
}
