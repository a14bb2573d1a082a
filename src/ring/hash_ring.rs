use std::collections::HashMap;

/// Hash function used to place peers and keys on the ring.
pub type Hash = fn(&[u8]) -> u32;

/// Consistent hash ring with `replicas` virtual nodes per peer.
pub struct HashRing {
    hash: Hash,
    replicas: usize,
    // Sorted virtual node hashes.
    keys: Vec<u32>,
    hash_map: HashMap<u32, String>,
}

impl HashRing {
    /// Creates an empty ring. `hash` defaults to CRC-32 (IEEE).
    pub fn new(replicas: usize, hash: Option<Hash>) -> Self {
        Self {
            hash: hash.unwrap_or(crc32fast::hash),
            replicas,
            keys: Vec::new(),
            hash_map: HashMap::new(),
        }
    }

    /// Places `replicas` virtual nodes for each peer on the ring.
    ///
    /// Virtual node `i` of peer `p` sits at `hash(format!("{i}{p}"))`. Peers are
    /// not deduplicated; add each one once per ring.
    pub fn add<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let hash = (self.hash)(format!("{}{}", i, peer).as_bytes());
                self.keys.push(hash);
                self.hash_map.insert(hash, peer.to_string());
            }
        }
        self.keys.sort_unstable();
    }

    /// Returns the peer owning `key`, or `None` when the ring is empty.
    ///
    /// The owner is the first virtual node clockwise from `hash(key)`, wrapping
    /// past the largest hash back to the smallest.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.keys.partition_point(|&k| k < hash);

        self.hash_map
            .get(&self.keys[idx % self.keys.len()])
            .map(String::as_str)
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    #[cfg(test)]
    pub(crate) fn virtual_nodes(&self) -> &[u32] {
        &self.keys
    }
}
