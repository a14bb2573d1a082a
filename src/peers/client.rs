use async_trait::async_trait;
use prost::Message;

use super::PeerGetter;
use super::error::TransportError;
use super::protocol::{Request, Response};

/// HTTP client for a single remote peer.
pub struct HttpGetter {
    /// Peer address joined with the pool's base path, e.g. `http://10.0.0.2:8008/_geecache/`.
    base_url: String,
    client: reqwest::Client,
}

impl HttpGetter {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds `<base_url><group>/<key>` with both segments percent-encoded.
    pub fn url_for(&self, req: &Request) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            urlencoding::encode(&req.group),
            urlencoding::encode(&req.key)
        )
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    /// Single attempt; timeouts and retries are left to the caller.
    async fn get(&self, req: &Request) -> Result<Response, TransportError> {
        let url = self.url_for(req);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().to_string()));
        }

        let body = response.bytes().await.map_err(TransportError::Body)?;
        let decoded = Response::decode(body)?;

        Ok(decoded)
    }
}
