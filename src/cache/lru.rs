use std::collections::HashMap;

/// A value that knows how many bytes it costs in the cache.
pub trait Weighted {
    fn weight(&self) -> usize;
}

/// Invoked synchronously with the key and value of every evicted entry.
pub type EvictionCallback<V> = Box<dyn FnMut(&str, &V) + Send>;

const NIL: usize = usize::MAX;

struct Entry<V> {
    key: String,
    value: V,
    prev: usize,
    next: usize,
}

/// Byte-bounded map with least-recently-used eviction.
///
/// Recency is an intrusive doubly linked list threaded through `entries` by
/// slot index: `head` is the most recently used entry, `tail` the least.
/// Removal uses `swap_remove`, so the entry that moves into the freed slot has
/// its neighbours and index re-pointed.
///
/// Not synchronized. `get` reorders recency, so every call needs exclusive access.
pub struct LruStore<V> {
    max_bytes: u64,
    nbytes: u64,
    entries: Vec<Entry<V>>,
    index: HashMap<String, usize>,
    head: usize,
    tail: usize,
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V: Weighted> LruStore<V> {
    /// Creates a store bounded to `max_bytes` of accounted size. Zero disables eviction.
    pub fn new(max_bytes: u64, on_evicted: Option<EvictionCallback<V>>) -> Self {
        Self {
            max_bytes,
            nbytes: 0,
            entries: Vec::new(),
            index: HashMap::new(),
            head: NIL,
            tail: NIL,
            on_evicted,
        }
    }

    /// Inserts or replaces `key`, marks it most recently used, then evicts
    /// from the cold end until the store fits its capacity again.
    pub fn add(&mut self, key: &str, value: V) {
        if let Some(&idx) = self.index.get(key) {
            self.move_to_front(idx);
            let (old_weight, new_weight) = {
                let entry = &mut self.entries[idx];
                let old = std::mem::replace(&mut entry.value, value);
                (old.weight() as u64, entry.value.weight() as u64)
            };
            self.nbytes = self.nbytes - old_weight + new_weight;
        } else {
            let cost = (key.len() + value.weight()) as u64;
            let idx = self.entries.len();
            self.entries.push(Entry {
                key: key.to_string(),
                value,
                prev: NIL,
                next: NIL,
            });
            self.push_front(idx);
            self.index.insert(key.to_string(), idx);
            self.nbytes += cost;
        }

        while self.max_bytes != 0 && self.max_bytes < self.nbytes {
            self.remove_oldest();
        }
    }

    /// Looks up `key` and, on a hit, marks it most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        Some(&self.entries[idx].value)
    }

    /// Evicts the least recently used entry, if any, and returns it.
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        if self.tail == NIL {
            return None;
        }
        let tail = self.tail;
        let entry = self.remove_at(tail);
        self.index.remove(&entry.key);
        self.nbytes -= (entry.key.len() + entry.value.weight()) as u64;

        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(&entry.key, &entry.value);
        }

        Some((entry.key, entry.value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current accounted size: the sum of key length plus value weight over all entries.
    pub fn bytes(&self) -> u64 {
        self.nbytes
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    fn push_front(&mut self, idx: usize) {
        self.entries[idx].prev = NIL;
        self.entries[idx].next = self.head;
        if self.head == NIL {
            self.tail = idx;
        } else {
            let head = self.head;
            self.entries[head].prev = idx;
        }
        self.head = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.entries[idx].prev, self.entries[idx].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.entries[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.entries[next].prev = prev;
        }
        self.entries[idx].prev = NIL;
        self.entries[idx].next = NIL;
    }

    fn remove_at(&mut self, idx: usize) -> Entry<V> {
        self.unlink(idx);
        let entry = self.entries.swap_remove(idx);

        // The former last slot now lives at `idx`.
        if idx < self.entries.len() {
            let (prev, next) = (self.entries[idx].prev, self.entries[idx].next);
            if prev == NIL {
                self.head = idx;
            } else {
                self.entries[prev].next = idx;
            }
            if next == NIL {
                self.tail = idx;
            } else {
                self.entries[next].prev = idx;
            }
            if let Some(slot) = self.index.get_mut(&self.entries[idx].key) {
                *slot = idx;
            }
        }

        entry
    }
}
