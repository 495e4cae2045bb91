//! LRU Tracker Module
//!
//! Tracks key recency for cache eviction. Keys live in an arena-backed
//! doubly-linked list indexed by key, so refreshing a key and evicting the
//! oldest key are both O(1).

use std::collections::HashMap;

/// Null link in the arena list.
const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node {
    key: String,
    prev: usize,
    next: usize,
}

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Nodes are linked where:
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// Freed arena slots are recycled, so the arena never grows past the
/// largest number of keys tracked at once.
#[derive(Debug)]
pub struct LruTracker {
    /// Arena of list nodes
    nodes: Vec<Node>,
    /// Key to arena slot
    index: HashMap<String, usize>,
    /// Recyclable arena slots
    free: Vec<usize>,
    head: usize,
    tail: usize,
}

impl LruTracker {
    // == Constructor ==
    /// Creates an empty tracker with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    // == Touch ==
    /// Marks a key as recently used (moves it to the head).
    ///
    /// Unknown keys are inserted at the head.
    pub fn touch(&mut self, key: &str) {
        if let Some(&slot) = self.index.get(key) {
            if slot != self.head {
                self.unlink(slot);
                self.push_front(slot);
            }
            return;
        }

        let slot = self.allocate(key.to_string());
        self.index.insert(key.to_string(), slot);
        self.push_front(slot);
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        if self.tail == NIL {
            return None;
        }

        let slot = self.tail;
        self.unlink(slot);
        let key = self.release(slot);
        self.index.remove(&key);
        Some(key)
    }

    /// Iterates tracked keys from least to most recently used.
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &str> + '_ {
        let start = (self.tail != NIL).then_some(self.tail);
        std::iter::successors(start, move |&slot| {
            let prev = self.nodes[slot].prev;
            (prev != NIL).then_some(prev)
        })
        .map(move |slot| self.nodes[slot].key.as_str())
    }

    // == Arena Helpers ==
    fn allocate(&mut self, key: String) -> usize {
        let node = Node {
            key,
            prev: NIL,
            next: NIL,
        };
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Frees an unlinked slot and hands back its key.
    fn release(&mut self, slot: usize) -> String {
        self.free.push(slot);
        std::mem::take(&mut self.nodes[slot].key)
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);

        if prev != NIL {
            self.nodes[prev].next = next;
        } else {
            self.head = next;
        }

        if next != NIL {
            self.nodes[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = NIL;
    }

    fn push_front(&mut self, slot: usize) {
        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = self.head;

        if self.head != NIL {
            self.nodes[self.head].prev = slot;
        }
        self.head = slot;

        if self.tail == NIL {
            self.tail = slot;
        }
    }
}

// == Test Inspection ==
// The cache reads order only through `iter_oldest_first`.
#[cfg(test)]
impl LruTracker {
    fn peek_oldest(&self) -> Option<&str> {
        (self.tail != NIL).then(|| self.nodes[self.tail].key.as_str())
    }

    fn peek_newest(&self) -> Option<&str> {
        (self.head != NIL).then(|| self.nodes[self.head].key.as_str())
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }
}
