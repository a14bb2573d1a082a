use axum::http::Method;
use axum::routing::get;
use axum::{Extension, Router};
use parking_lot::Mutex;
use prost::Message;
use std::collections::HashMap;
use std::sync::Arc;

use super::client::HttpGetter;
use super::error::ServeError;
use super::handlers::handle_peer_get;
use super::protocol::{DEFAULT_BASE_PATH, DEFAULT_REPLICAS, Response};
use super::{GroupSource, PeerGetter, PeerPicker};
use crate::ring::hash_ring::{Hash, HashRing};

/// Tunables for an `HttpPool`.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Path prefix for peer traffic; normalized to start and end with `/`.
    pub base_path: String,
    /// Virtual nodes per peer on the hash ring.
    pub replicas: usize,
    /// Ring hash function; `None` selects CRC-32C.
    pub hash: Option<Hash>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            hash: None,
        }
    }
}

struct PeerSet {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

/// A node's view of its peers: serves peer lookups and routes keys to owners.
///
/// The ring and the getter map are replaced together by `set_peers` and read
/// together by `pick_peer`, always under the same lock.
pub struct HttpPool {
    /// This node's own address as it appears in the peer list, e.g. `http://10.0.0.1:8001`.
    self_addr: String,
    base_path: String,
    replicas: usize,
    hash: Option<Hash>,
    client: reqwest::Client,
    peers: Mutex<PeerSet>,
}

impl HttpPool {
    pub fn new(self_addr: impl Into<String>) -> Self {
        Self::with_config(self_addr, PoolConfig::default())
    }

    /// Builds a pool from `config`.
    ///
    /// An empty `base_path` normalizes to `/`. The pool then owns every path on
    /// its listener, so the unexpected-path panic in `parse_path` cannot fire.
    pub fn with_config(self_addr: impl Into<String>, config: PoolConfig) -> Self {
        let cleaned = config.base_path.trim_matches('/');
        let base_path = if cleaned.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", cleaned)
        };

        Self {
            self_addr: self_addr.into(),
            base_path,
            replicas: config.replicas,
            hash: config.hash,
            client: reqwest::Client::new(),
            peers: Mutex::new(PeerSet {
                ring: HashRing::new(config.replicas, config.hash),
                getters: HashMap::new(),
            }),
        }
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Replaces the whole peer set. The ring is rebuilt from scratch, so every
    /// key may move; there is no incremental add or remove.
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let peers: Vec<String> = peers.into_iter().map(Into::into).collect();

        let mut ring = HashRing::new(self.replicas, self.hash);
        ring.add(&peers);

        let getters = peers
            .iter()
            .map(|peer| {
                let base_url = format!("{}{}", peer.trim_end_matches('/'), self.base_path);
                (
                    peer.clone(),
                    Arc::new(HttpGetter::new(base_url, self.client.clone())),
                )
            })
            .collect();

        *self.peers.lock() = PeerSet { ring, getters };

        tracing::info!(
            "[Server {}] Peer set replaced with {} peer(s)",
            self.self_addr,
            peers.len()
        );
    }

    /// Peers currently on the ring, sorted.
    pub fn peers(&self) -> Vec<String> {
        let mut peers: Vec<String> = self.peers.lock().getters.keys().cloned().collect();
        peers.sort();
        peers
    }

    /// Splits `<base_path><group>/<key>` into its percent-decoded segments.
    ///
    /// # Panics
    /// If `path` does not start with the base path. The router only mounts this
    /// pool under its base path, so a mismatch is a wiring bug.
    pub fn parse_path(&self, path: &str) -> Result<(String, String), ServeError> {
        let Some(rest) = path.strip_prefix(self.base_path.as_str()) else {
            panic!("HttpPool serving unexpected path: {}", path);
        };

        let (group, key) = rest.split_once('/').ok_or(ServeError::BadRequest)?;
        let group = urlencoding::decode(group).map_err(|_| ServeError::BadRequest)?;
        let key = urlencoding::decode(key).map_err(|_| ServeError::BadRequest)?;

        Ok((group.into_owned(), key.into_owned()))
    }

    /// Answers one peer request and returns the encoded `Response` body.
    pub async fn serve(
        &self,
        groups: &dyn GroupSource,
        method: &Method,
        path: &str,
    ) -> Result<Vec<u8>, ServeError> {
        tracing::info!("[Server {}] {} {}", self.self_addr, method, path);

        let (group_name, key) = self.parse_path(path)?;
        let group = groups
            .get_group(&group_name)
            .ok_or(ServeError::NoSuchGroup(group_name))?;

        let view = group.get(&key).await.map_err(ServeError::Lookup)?;

        Ok(Response {
            value: view.byte_slice(),
        }
        .encode_to_vec())
    }

    /// Router serving `GET <base_path>` and everything below it for this pool.
    ///
    /// The bare base path is mounted too, so an empty `<group>/<key>` remainder
    /// reaches `parse_path` and is answered with 400.
    pub fn router(self: Arc<Self>, groups: Arc<dyn GroupSource>) -> Router {
        let route = format!("{}*path", self.base_path);
        Router::new()
            .route(&self.base_path, get(handle_peer_get))
            .route(&route, get(handle_peer_get))
            .layer(Extension(self))
            .layer(Extension(groups))
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.peers.lock();
        match state.ring.get(key) {
            Some(peer) if peer != self.self_addr => {
                tracing::info!("[Server {}] Pick peer {}", self.self_addr, peer);
                state
                    .getters
                    .get(peer)
                    .map(|getter| getter.clone() as Arc<dyn PeerGetter>)
            }
            _ => None,
        }
    }
}
