use axum::{
    extract::Extension,
    http::{Method, Uri, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::GroupSource;
use super::error::ServeError;
use super::pool::HttpPool;
use super::protocol::CONTENT_TYPE_OCTET_STREAM;

pub async fn handle_peer_get(
    Extension(pool): Extension<Arc<HttpPool>>,
    Extension(groups): Extension<Arc<dyn GroupSource>>,
    method: Method,
    uri: Uri,
) -> Response {
    match pool.serve(groups.as_ref(), &method, uri.path()).await {
        Ok(body) => ([(header::CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM)], body).into_response(),
        Err(e) => {
            if let ServeError::Lookup(cause) = &e {
                tracing::error!("Failed to get {}: {}", uri.path(), cause);
            }
            e.into_response()
        }
    }
}
