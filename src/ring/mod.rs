//! Consistent Hashing Module
//!
//! Assigns every key to exactly one owning peer. Each physical peer is placed on a
//! 32-bit hash ring many times (virtual nodes), which evens out the share of the
//! keyspace each peer covers. Adding or removing one peer only moves the keys that
//! fall between its virtual nodes and their predecessors.

pub mod hash_ring;
