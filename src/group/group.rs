use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};

use crate::cache::byteview::ByteView;
use crate::cache::lru::{EvictionCallback, LruStore};
use crate::peers::protocol::Request;
use crate::peers::{CacheGroup, PeerGetter, PeerPicker};

/// Type-erased loader: produces the bytes for a key when no cache or peer has them.
pub type GetterFn =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send>> + Send + Sync>;

/// A named cache namespace backed by a loader.
pub struct Group {
    name: String,
    getter: GetterFn,
    main_cache: Mutex<LruStore<ByteView>>,
    peers: OnceLock<Arc<dyn PeerPicker>>,
}

impl Group {
    /// Creates a group whose main cache holds at most `cache_bytes` (0 = unbounded).
    pub fn new<F, Fut>(name: &str, cache_bytes: u64, getter: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<u8>>> + Send + 'static,
    {
        Self::build(name, LruStore::new(cache_bytes, None), getter)
    }

    /// Like `new`, but `on_evicted` runs for every entry the main cache evicts.
    pub fn with_eviction_callback<F, Fut>(
        name: &str,
        cache_bytes: u64,
        getter: F,
        on_evicted: EvictionCallback<ByteView>,
    ) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<u8>>> + Send + 'static,
    {
        Self::build(name, LruStore::new(cache_bytes, Some(on_evicted)), getter)
    }

    fn build<F, Fut>(name: &str, store: LruStore<ByteView>, getter: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<u8>>> + Send + 'static,
    {
        let getter: GetterFn = Arc::new(move |key: String| {
            Box::pin(getter(key)) as Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send>>
        });

        Self {
            name: name.to_string(),
            getter,
            main_cache: Mutex::new(store),
            peers: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attaches the peer router. Allowed once per group.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers
            .set(peers)
            .map_err(|_| anyhow::anyhow!("Peers already registered for group {}", self.name))
    }

    /// Returns the value for `key` from the main cache, its remote owner, or the loader.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(anyhow::anyhow!("key is required"));
        }

        let cached = self.main_cache.lock().get(key).cloned();
        if let Some(view) = cached {
            tracing::debug!("[{}] cache hit for {}", self.name, key);
            return Ok(view);
        }

        self.load(key).await
    }

    /// Number of entries currently held in the main cache.
    pub fn cached_entries(&self) -> usize {
        self.main_cache.lock().len()
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        if let Some(picker) = self.peers.get()
            && let Some(peer) = picker.pick_peer(key)
        {
            match self.get_from_peer(peer.as_ref(), key).await {
                Ok(view) => return Ok(view),
                Err(e) => {
                    tracing::warn!("[{}] Failed to get {} from peer: {}", self.name, key, e);
                }
            }
        }

        self.get_locally(key).await
    }

    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let response = peer.get(&Request::new(self.name.as_str(), key)).await?;
        Ok(ByteView::from(response.value))
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = (self.getter)(key.to_string()).await?;
        let view = ByteView::from(bytes);

        tracing::debug!("[{}] loaded {} ({} bytes)", self.name, key, view.len());
        self.populate_cache(key, view.clone());

        Ok(view)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.lock().add(key, value);
    }
}

#[async_trait]
impl CacheGroup for Group {
    async fn get(&self, key: &str) -> Result<ByteView> {
        Group::get(self, key).await
    }
}
