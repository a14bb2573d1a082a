//! Peer Transport Module
//!
//! Lets any node find and fetch a key owned by another node.
//!
//! ## Core Concepts
//! - **Routing**: `HttpPool` keeps a consistent hash ring over the current peer set and
//!   answers "who owns this key?" (`PeerPicker`). The local node never routes to itself.
//! - **Client**: `HttpGetter` asks one remote peer for `<group>/<key>` (`PeerGetter`).
//! - **Server**: `HttpPool` also serves `GET <base_path><group>/<key>` by resolving the
//!   group through an injected `GroupSource` and encoding the value as protobuf.
//!
//! Locks guard only in-memory routing state; network calls never run under them.

pub mod client;
pub mod error;
pub mod handlers;
pub mod pool;
pub mod protocol;


use async_trait::async_trait;
use std::sync::Arc;

use crate::cache::byteview::ByteView;
use error::TransportError;
use protocol::{Request, Response};

/// Locates the peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the remote owner of `key`, or `None` when this node owns it
    /// (or no peers are configured).
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

/// Fetches a value from one remote peer.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    async fn get(&self, req: &Request) -> Result<Response, TransportError>;
}

/// A named cache group able to produce the value for a key.
#[async_trait]
pub trait CacheGroup: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<ByteView>;
}

/// Resolves group names for the peer server.
pub trait GroupSource: Send + Sync {
    fn get_group(&self, name: &str) -> Option<Arc<dyn CacheGroup>>;
}
