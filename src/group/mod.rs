//! Cache Group Module
//!
//! A reference orchestrator for the cache core. A `Group` is a named namespace with
//! its own main cache and a caller-supplied loader; the `GroupRegistry` maps names to
//! groups and is what the peer server consults.
//!
//! ## Lookup Flow
//! 1. **Main cache**: served directly on a hit.
//! 2. **Remote owner**: if a `PeerPicker` is registered and names a remote owner, the value
//!    is fetched from that peer. Failures are logged and fall through.
//! 3. **Loader**: the value is produced locally and added to the main cache.
//!
//! Concurrent misses for the same key are not collapsed; each one loads.

pub mod group;
pub mod registry;
