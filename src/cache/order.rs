//! Insertion Order Module
//!
//! Tracks the order in which keys were written so the oldest can be evicted.

use std::collections::VecDeque;

// == Insertion Order ==
/// FIFO queue of cache keys.
///
/// - Front = oldest insertion (next eviction candidate)
/// - Back = newest insertion
///
/// Reads never reorder the queue; only writes do.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: VecDeque<String>,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record Insert ==
    /// Marks a key as the newest insertion.
    ///
    /// An overwrite of an existing key counts as a fresh insertion and moves
    /// the key to the back.
    pub fn record_insert(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the queue.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest inserted key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn drain(order: &mut InsertionOrder) -> Vec<String> {
        std::iter::from_fn(|| order.pop_oldest()).collect()
    }

    #[test]
    fn test_order_new() {
        let mut order = InsertionOrder::new();
        assert_eq!(order.pop_oldest(), None);
    }

    #[test]
    fn test_order_first_insert_is_oldest() {
        let mut order = InsertionOrder::new();

        order.record_insert("key1");
        order.record_insert("key2");
        order.record_insert("key3");

        assert_eq!(order.pop_oldest(), Some("key1".to_string()));
    }

    #[test]
    fn test_order_reinsert_moves_to_back() {
        let mut order = InsertionOrder::new();

        order.record_insert("a");
        order.record_insert("b");
        order.record_insert("c");
        order.record_insert("a");

        assert_eq!(drain(&mut order), vec!["b", "c", "a"]);
        assert_eq!(order.pop_oldest(), None);
    }

    #[test]
    fn test_order_remove() {
        let mut order = InsertionOrder::new();

        order.record_insert("key1");
        order.record_insert("key2");
        order.record_insert("key3");

        order.remove("key2");
        order.remove("nonexistent");

        assert_eq!(drain(&mut order), vec!["key1", "key3"]);
    }

    #[test]
    fn test_order_same_key_many_times() {
        let mut order = InsertionOrder::new();

        order.record_insert("key1");
        order.record_insert("key1");
        order.record_insert("key1");

        assert_eq!(drain(&mut order), vec!["key1"]);
    }
}
