use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors surfaced to a caller of `PeerGetter::get`. Never retried internally.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, or any other send failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The peer answered with a non-2xx status.
    #[error("server returned: {0}")]
    Status(String),

    #[error("reading response body: {0}")]
    Body(reqwest::Error),

    #[error("decoding response body: {0}")]
    Decode(#[from] prost::DecodeError),
}

/// Per-request failures of the peer server.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The path did not split into `<group>/<key>`.
    #[error("bad request")]
    BadRequest,

    #[error("no such group: {0}")]
    NoSuchGroup(String),

    /// The group failed to produce the value.
    #[error("{0}")]
    Lookup(anyhow::Error),
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::BadRequest => StatusCode::BAD_REQUEST,
            ServeError::NoSuchGroup(_) => StatusCode::NOT_FOUND,
            ServeError::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
