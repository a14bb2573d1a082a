//! Local Cache Module
//!
//! Holds the bounded, in-process shard of the cache that each node owns.
//!
//! ## Core Concepts
//! - **ByteView**: An immutable byte payload. Readers always receive a copy, so cached bytes
//!   can never be changed by a consumer.
//! - **LruStore**: A byte-capacity-limited map with least-recently-used eviction. It is not
//!   synchronized; the owner guards it with a single mutex (reads reorder recency too).

pub mod byteview;
pub mod lru;

#[cfg(test)]
mod tests;
