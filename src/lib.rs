//! Distributed Read-Through Cache Library
//!
//! This library crate defines the modules that make up a cache node. It serves as the
//! foundation for the node binary (`main.rs`).
//!
//! ## Architecture Modules
//! - **`cache`**: The local shard. An immutable `ByteView` value type and a byte-bounded
//!   LRU store with an optional eviction callback.
//! - **`ring`**: Consistent hashing with virtual nodes. Maps each key to the peer that owns it.
//! - **`peers`**: The peer transport. An HTTP server answering `<group>/<key>` lookups with
//!   protobuf bodies, an HTTP client for remote peers, and key-to-peer routing.
//! - **`group`**: A reference orchestrator. Named groups that read through their main cache,
//!   the owning peer, and finally a caller-supplied loader.

pub mod cache;
pub mod group;
pub mod peers;
pub mod ring;
