//! Peer Network Protocol
//!
//! Defines the path layout and the binary messages exchanged between peers.
//!
//! A lookup is a body-less `GET <base_path><group>/<key>` with both segments
//! percent-encoded. The reply body is a protobuf-encoded `Response`.

/// Default path prefix for peer traffic.
pub const DEFAULT_BASE_PATH: &str = "/_geecache/";
/// Default number of virtual nodes per peer on the hash ring.
pub const DEFAULT_REPLICAS: usize = 50;
/// Content type of encoded `Response` bodies.
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Identifies the value being asked for. Only used to build the request path.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Request {
    #[prost(string, tag = "1")]
    pub group: String,
    #[prost(string, tag = "2")]
    pub key: String,
}

impl Request {
    pub fn new(group: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
        }
    }
}

/// The raw value bytes for a lookup.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Response {
    #[prost(bytes = "vec", tag = "1")]
    pub value: Vec<u8>,
}
