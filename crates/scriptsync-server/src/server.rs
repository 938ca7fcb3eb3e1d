//! HTTP server implementation.

use crate::handlers::{get_scripts, not_found};
use axum::routing::get;
use axum::Router;
use scriptsync_core::ScriptStore;
use std::future::Future;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

/// The one route the server answers.
pub const SCRIPTS_PATH: &str = "/scripts";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the router serving `store`.
pub fn router(store: ScriptStore) -> Router {
    Router::new()
        .route(SCRIPTS_PATH, get(get_scripts).fallback(not_found))
        .fallback(not_found)
        .with_state(store)
}

/// The scriptsync HTTP server.
pub struct ScriptServer {
    config: ServerConfig,
    store: ScriptStore,
}

impl ScriptServer {
    /// Creates a server reading from `store`.
    pub fn new(store: ScriptStore, config: ServerConfig) -> Self {
        Self { config, store }
    }

    /// Binds the listener. Done separately so a busy port fails startup early.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let addr = self.config.addr;
        TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })
    }

    /// Binds and serves forever.
    pub async fn run(&self) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.serve(listener, std::future::pending()).await
    }

    /// Binds and serves until `shutdown` resolves.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            info!("🌐 HTTP server running on http://{}", addr);
        }

        axum::serve(listener, router(self.store.clone()))
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use scriptsync_core::ScriptMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;
    use tower::ServiceExt;

    fn sample_store() -> ScriptStore {
        let mut scripts = ScriptMap::new();
        scripts.insert("a.lua".into(), "print(1)".into());
        scripts.insert("shared/b.luau".into(), "print(\"two\")\n".into());
        ScriptStore::with_scripts(scripts)
    }

    async fn call(store: ScriptStore, method: Method, uri: &str) -> axum::response::Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        router(store).oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_scripts_returns_snapshot_as_json() {
        let store = sample_store();
        let response = call(store.clone(), Method::GET, "/scripts").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let served: ScriptMap = serde_json::from_slice(&body).unwrap();
        assert_eq!(served, *store.get());
    }

    #[tokio::test]
    async fn test_empty_store_serves_empty_object() {
        let response = call(ScriptStore::new(), Method::GET, "/scripts").await;

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"{}");
    }

    #[tokio::test]
    async fn test_replacement_is_visible_to_next_request() {
        let store = ScriptStore::new();
        let mut scripts = ScriptMap::new();
        scripts.insert("a.lua".into(), "print(3)".into());
        store.replace(scripts);

        let response = call(store, Method::GET, "/scripts").await;
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"a.lua":"print(3)"}"#);
    }

    #[tokio::test]
    async fn test_other_paths_are_bare_404() {
        for uri in ["/", "/script", "/scripts/a.lua", "/anything-else"] {
            let response = call(sample_store(), Method::GET, uri).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);

            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert!(body.is_empty());
        }
    }

    #[tokio::test]
    async fn test_other_methods_are_404() {
        let response = call(sample_store(), Method::POST, "/scripts").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serves_over_tcp_until_shutdown() {
        let server = ScriptServer::new(
            sample_store(),
            ServerConfig {
                addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            },
        );
        let listener = server.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            server
                .serve(listener, async {
                    let _ = stop_rx.await;
                })
                .await
        });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /scripts HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        let raw = String::from_utf8(raw).unwrap();

        assert!(raw.starts_with("HTTP/1.1 200 OK"));
        let (head, body) = raw.split_once("\r\n\r\n").unwrap();
        assert!(head.to_ascii_lowercase().contains("access-control-allow-origin: *"));
        let served: ScriptMap = serde_json::from_str(body).unwrap();
        assert_eq!(served.len(), 2);

        stop_tx.send(()).unwrap();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_run_until_binds_configured_addr() {
        let port = {
            let free = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            free.local_addr().unwrap().port()
        };
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let server = ScriptServer::new(sample_store(), ServerConfig { addr });

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            server
                .run_until(async {
                    let _ = stop_rx.await;
                })
                .await
        });

        let mut stream = None;
        for _ in 0..200 {
            if let Ok(s) = TcpStream::connect(addr).await {
                stream = Some(s);
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        let mut stream = stream.expect("server never started listening");
        stream
            .write_all(b"GET /nope HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        assert!(String::from_utf8(raw).unwrap().starts_with("HTTP/1.1 404"));

        stop_tx.send(()).unwrap();
        tokio::time::timeout(std::time::Duration::from_secs(5), task)
            .await
            .expect("server did not stop")
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_bind_conflict_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let server = ScriptServer::new(ScriptStore::new(), ServerConfig { addr });
        match server.bind().await {
            Err(ServerError::Bind { addr: reported, .. }) => assert_eq!(reported, addr),
            other => panic!("expected bind error, got {:?}", other.map(|_| ())),
        }
    }
}
