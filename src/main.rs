use axum::extract::{Extension, Query};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing::get};
use geecache::group::group::Group;
use geecache::group::registry::GroupRegistry;
use geecache::peers::pool::HttpPool;
use geecache::peers::protocol::CONTENT_TYPE_OCTET_STREAM;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;

const DEFAULT_CACHE_BYTES: u64 = 2 << 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        // .with_max_level(tracing::Level::DEBUG)
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!(
            "Usage: {} --bind <addr:port> [--peer <addr:port>]... [--api <addr:port>] [--cache-bytes <n>]",
            args[0]
        );
        eprintln!("Example: {} --bind 127.0.0.1:8001", args[0]);
        eprintln!(
            "Example: {} --bind 127.0.0.1:8001 --peer 127.0.0.1:8002 --peer 127.0.0.1:8003 --api 127.0.0.1:9999",
            args[0]
        );

        std::process::exit(1);
    }

    let mut bind_addr: Option<SocketAddr> = None;
    let mut peer_addrs: Vec<SocketAddr> = vec![];
    let mut api_addr: Option<SocketAddr> = None;
    let mut cache_bytes = DEFAULT_CACHE_BYTES;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = Some(flag_value(&args, i)?.parse()?);
                i += 2;
            }
            "--peer" => {
                peer_addrs.push(flag_value(&args, i)?.parse()?);
                i += 2;
            }
            "--api" => {
                api_addr = Some(flag_value(&args, i)?.parse()?);
                i += 2;
            }
            "--cache-bytes" => {
                cache_bytes = flag_value(&args, i)?.parse()?;
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let bind_addr = bind_addr.ok_or_else(|| anyhow::anyhow!("--bind is required"))?;
    let self_url = format!("http://{}", bind_addr);

    let mut peers: Vec<String> = peer_addrs
        .iter()
        .map(|addr| format!("http://{}", addr))
        .collect();
    if !peers.contains(&self_url) {
        peers.push(self_url.clone());
    }

    tracing::info!("Starting cache node on {}", self_url);
    tracing::info!("Peers: {:?}", peers);

    // 1. Peer routing:
    let pool = Arc::new(HttpPool::new(self_url.clone()));
    pool.set_peers(peers);

    // 2. Cache groups:
    let registry = GroupRegistry::new();
    let scores = registry.register(create_scores_group(cache_bytes));
    scores.register_peers(pool.clone())?;

    // 3. Optional front API:
    if let Some(api_addr) = api_addr {
        let app = Router::new()
            .route("/api", get(handle_api_get))
            .layer(Extension(scores.clone()));

        let listener = tokio::net::TcpListener::bind(api_addr).await?;
        tracing::info!("Front API listening on {}", api_addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Front API stopped: {}", e);
            }
        });
    }

    // 4. Peer server:
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Peer server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, pool.router(registry)).await?;

    Ok(())
}

fn flag_value(args: &[String], i: usize) -> anyhow::Result<&str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("{} requires a value", args[i]))
}

/// Demo group backed by a slow in-memory "database".
fn create_scores_group(cache_bytes: u64) -> Group {
    Group::new("scores", cache_bytes, |key: String| async move {
        tracing::info!("[SlowDB] search key {}", key);
        slow_db_lookup(&key)
            .map(|score| score.as_bytes().to_vec())
            .ok_or_else(|| anyhow::anyhow!("{} not exist", key))
    })
}

fn slow_db_lookup(key: &str) -> Option<&'static str> {
    match key {
        "Tom" => Some("630"),
        "Jack" => Some("589"),
        "Sam" => Some("567"),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct ApiParams {
    key: String,
}

async fn handle_api_get(
    Extension(group): Extension<Arc<Group>>,
    Query(params): Query<ApiParams>,
) -> Response {
    match group.get(&params.key).await {
        Ok(view) => (
            [(header::CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM)],
            view.byte_slice(),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to get {}: {}", params.key, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
