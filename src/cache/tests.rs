//! Cache Module Tests
//!
//! ## Test Scopes
//! - **ByteView**: Copies handed to callers are independent of the cached bytes.
//! - **LruStore**: Size accounting, strict LRU eviction order and the eviction callback.
//! - **Properties**: Random add/get sequences checked against a simple reference model.

#[cfg(test)]
mod tests {
    use crate::cache::byteview::ByteView;
    use crate::cache::lru::{LruStore, Weighted};
    use parking_lot::Mutex;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn view(s: &str) -> ByteView {
        ByteView::from(s)
    }

    // ============================================================
    // BYTEVIEW TESTS
    // ============================================================

    #[test]
    fn test_byteview_len_and_string() {
        let v = view("hello");
        assert_eq!(v.len(), 5);
        assert!(!v.is_empty());
        assert_eq!(v.as_string(), "hello");
        assert_eq!(v.to_string(), "hello");
        assert_eq!(v.weight(), 5);
    }

    #[test]
    fn test_byteview_slice_is_a_copy() {
        let v = ByteView::from(vec![1u8, 2, 3]);

        let mut copy = v.byte_slice();
        copy[0] = 42;
        copy.push(4);

        assert_eq!(v.byte_slice(), vec![1, 2, 3], "Cached bytes must not change");
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn test_byteview_clones_are_equal() {
        let v = view("shared");
        let w = v.clone();
        assert_eq!(v, w);
        assert_eq!(w.as_string(), "shared");
    }

    #[test]
    fn test_byteview_empty() {
        let v = ByteView::from(Vec::new());
        assert!(v.is_empty());
        assert_eq!(v.as_string(), "");
    }

    // ============================================================
    // LRU STORE TESTS
    // ============================================================

    #[test]
    fn test_get_hit_and_miss() {
        let mut lru = LruStore::new(0, None);
        lru.add("key1", view("1234"));

        assert_eq!(lru.get("key1").map(|v| v.as_string()), Some("1234".to_string()));
        assert!(lru.get("key2").is_none());
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_remove_oldest_when_full() {
        let (k1, k2, k3) = ("key1", "key2", "k3");
        let (v1, v2, v3) = ("value1", "value2", "v3");
        let cap = (k1.len() + k2.len() + v1.len() + v2.len()) as u64;

        let mut lru = LruStore::new(cap, None);
        lru.add(k1, view(v1));
        lru.add(k2, view(v2));
        lru.add(k3, view(v3));

        assert!(lru.get(k1).is_none(), "key1 should have been evicted");
        assert_eq!(lru.len(), 2);
        assert!(lru.bytes() <= cap);
    }

    #[test]
    fn test_eviction_callback_receives_keys_in_order() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = evicted.clone();

        let mut lru = LruStore::<ByteView>::new(
            10,
            Some(Box::new(move |key: &str, _value: &ByteView| {
                sink.lock().push(key.to_string());
            })),
        );

        lru.add("key1", view("123456"));
        lru.add("k2", view("k2"));
        lru.add("k3", view("k3"));
        lru.add("k4", view("k4"));

        assert_eq!(*evicted.lock(), vec!["key1".to_string(), "k2".to_string()]);
        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn test_overwrite_adjusts_accounted_size() {
        let mut lru = LruStore::new(0, None);
        lru.add("key", view("1"));
        lru.add("key", view("111"));

        assert_eq!(lru.bytes(), ("key".len() + "111".len()) as u64);
        assert_eq!(lru.len(), 1);
        assert_eq!(lru.get("key").map(|v| v.as_string()), Some("111".to_string()));
    }

    #[test]
    fn test_overwrite_does_not_invoke_callback() {
        let calls = Arc::new(Mutex::new(0usize));
        let counter = calls.clone();

        let mut lru = LruStore::<ByteView>::new(
            0,
            Some(Box::new(move |_: &str, _: &ByteView| {
                *counter.lock() += 1;
            })),
        );
        lru.add("key", view("a"));
        lru.add("key", view("b"));

        assert_eq!(*calls.lock(), 0);
    }

    #[test]
    fn test_get_protects_entry_from_eviction() {
        // Capacity fits exactly two entries.
        let cap = ("k1".len() + "v1".len() + "k2".len() + "v2".len()) as u64;
        let mut lru = LruStore::new(cap, None);

        lru.add("k1", view("v1"));
        lru.add("k2", view("v2"));
        assert!(lru.get("k1").is_some());
        lru.add("k3", view("v3"));

        assert!(lru.get("k2").is_none(), "k2 was least recently used");
        assert!(lru.get("k1").is_some());
        assert!(lru.get("k3").is_some());
    }

    #[test]
    fn test_overwrite_moves_entry_to_front() {
        let cap = ("a".len() + "1".len()) as u64 * 2;
        let mut lru = LruStore::new(cap, None);

        lru.add("a", view("1"));
        lru.add("b", view("2"));
        lru.add("a", view("3"));
        lru.add("c", view("4"));

        assert!(lru.get("b").is_none());
        assert_eq!(lru.get("a").map(|v| v.as_string()), Some("3".to_string()));
    }

    #[test]
    fn test_entry_larger_than_capacity_is_evicted_immediately() {
        let mut lru = LruStore::new(4, None);
        lru.add("big", view("too large"));

        assert!(lru.is_empty());
        assert_eq!(lru.bytes(), 0);
    }

    #[test]
    fn test_zero_capacity_never_evicts() {
        let mut lru = LruStore::new(0, None);
        for i in 0..1000 {
            lru.add(&format!("key-{}", i), view("some value"));
        }
        assert_eq!(lru.len(), 1000);
        assert!(lru.get("key-0").is_some());
    }

    #[test]
    fn test_remove_oldest_on_empty_is_noop() {
        let mut lru: LruStore<ByteView> = LruStore::new(100, None);
        assert!(lru.remove_oldest().is_none());
        assert_eq!(lru.len(), 0);
        assert_eq!(lru.bytes(), 0);
    }

    #[test]
    fn test_remove_oldest_returns_lru_entry_and_fires_callback() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = evicted.clone();
        let mut lru = LruStore::<ByteView>::new(
            0,
            Some(Box::new(move |key: &str, value: &ByteView| {
                sink.lock().push((key.to_string(), value.as_string()));
            })),
        );

        lru.add("a", view("1"));
        lru.add("b", view("2"));
        lru.add("c", view("3"));
        lru.get("a");

        let (key, value) = lru.remove_oldest().unwrap();
        assert_eq!(key, "b");
        assert_eq!(value.as_string(), "2");
        assert_eq!(*evicted.lock(), vec![("b".to_string(), "2".to_string())]);
        assert_eq!(lru.bytes(), 4);
    }

    #[test]
    fn test_slots_are_reused_after_eviction() {
        let mut lru = LruStore::new(0, None);
        for i in 0..10 {
            lru.add(&format!("k{}", i), view("v"));
        }
        // Touch every third entry so recency differs from slot order.
        for i in (0..10).step_by(3) {
            lru.get(&format!("k{}", i));
        }
        let mut order = Vec::new();
        while let Some((key, _)) = lru.remove_oldest() {
            order.push(key);
        }
        assert_eq!(
            order,
            vec!["k1", "k2", "k4", "k5", "k7", "k8", "k0", "k3", "k6", "k9"]
        );
        assert!(lru.is_empty());
        assert_eq!(lru.bytes(), 0);
    }

    // ============================================================
    // PROPERTY TESTS
    // ============================================================

    /// Reference model: a vector ordered from most to least recently used.
    struct Model {
        cap: u64,
        order: Vec<(String, usize)>,
    }

    impl Model {
        fn bytes(&self) -> u64 {
            self.order.iter().map(|(k, w)| (k.len() + w) as u64).sum()
        }

        fn add(&mut self, key: &str, weight: usize) {
            if let Some(pos) = self.order.iter().position(|(k, _)| k == key) {
                self.order.remove(pos);
            }
            self.order.insert(0, (key.to_string(), weight));
            while self.cap != 0 && self.bytes() > self.cap {
                self.order.pop();
            }
        }

        fn get(&mut self, key: &str) -> Option<usize> {
            let pos = self.order.iter().position(|(k, _)| k == key)?;
            let entry = self.order.remove(pos);
            let weight = entry.1;
            self.order.insert(0, entry);
            Some(weight)
        }
    }

    proptest! {
        #[test]
        fn test_lru_matches_reference_model(
            cap in 0u64..120,
            ops in prop::collection::vec((0u8..16, 0usize..24, any::<bool>()), 1..200)
        ) {
            let mut lru = LruStore::<ByteView>::new(cap, None);
            let mut model = Model { cap, order: Vec::new() };

            for (k, weight, is_get) in ops {
                let key = format!("key{}", k);
                if is_get {
                    let got = lru.get(&key).map(|v| v.len());
                    prop_assert_eq!(got, model.get(&key));
                } else {
                    lru.add(&key, ByteView::from(vec![b'x'; weight]));
                    model.add(&key, weight);
                }

                prop_assert_eq!(lru.len(), model.order.len());
                prop_assert_eq!(lru.bytes(), model.bytes());
                if cap != 0 {
                    prop_assert!(lru.bytes() <= cap);
                }
            }

            // Draining must follow strict least-recently-used order.
            let mut drained = Vec::new();
            while let Some((key, _)) = lru.remove_oldest() {
                drained.push(key);
            }
            let expected: Vec<String> = model.order.iter().rev().map(|(k, _)| k.clone()).collect();
            prop_assert_eq!(drained, expected);
        }

        #[test]
        fn test_evicted_keys_are_not_found(
            keys in prop::collection::vec(0u16..500, 1..100)
        ) {
            let evicted = Arc::new(Mutex::new(Vec::new()));
            let sink = evicted.clone();
            let mut lru = LruStore::<ByteView>::new(
                64,
                Some(Box::new(move |key: &str, _: &ByteView| sink.lock().push(key.to_string()))),
            );

            let mut live = std::collections::HashSet::new();
            let mut dead = std::collections::HashSet::new();
            for k in &keys {
                let key = format!("k{}", k);
                lru.add(&key, view("0123456789"));
                dead.remove(&key);
                live.insert(key);
                for gone in evicted.lock().drain(..) {
                    live.remove(&gone);
                    dead.insert(gone);
                }
            }

            prop_assert_eq!(lru.len(), live.len());
            for key in &dead {
                prop_assert!(lru.get(key).is_none());
            }
            for key in &live {
                prop_assert!(lru.get(key).is_some());
            }
        }
    }
}
