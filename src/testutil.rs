// src/testutil.rs
//
// Shared helpers for the unit tests: a tracing test writer, an in-memory JSON
// source and a tiny HTTP server that answers canned responses.

use reqwest::StatusCode;
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::error::FetchError;
use crate::fetch::JsonSource;

pub fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,fplscraper=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Answers from a fixed path → JSON map; unknown paths are a 404.
pub struct MapSource {
    bodies: HashMap<String, Value>,
    requested: Mutex<Vec<String>>,
}

impl MapSource {
    pub fn new(bodies: Vec<(&str, Value)>) -> Self {
        Self {
            bodies: bodies
                .into_iter()
                .map(|(p, v)| (p.to_string(), v))
                .collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl JsonSource for MapSource {
    async fn get_json(&self, path: &str) -> Result<Value, FetchError> {
        self.requested.lock().unwrap().push(path.to_string());
        self.bodies
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: path.to_string(),
                status: StatusCode::NOT_FOUND,
            })
    }
}

type Routes = HashMap<String, (u16, String)>;

/// Local HTTP/1.1 server rooted at `/api/`. Paths without a route get a 404.
pub struct StubServer {
    pub base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(routes: Vec<(&str, u16, &str)>) -> Self {
        let routes: Arc<Routes> = Arc::new(
            routes
                .into_iter()
                .map(|(p, s, b)| (p.to_string(), (s, b.to_string())))
                .collect(),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(Mutex::new(Vec::new()));

        let handle = tokio::spawn({
            let hits = Arc::clone(&hits);
            async move {
                while let Ok((mut sock, _)) = listener.accept().await {
                    let routes = Arc::clone(&routes);
                    let hits = Arc::clone(&hits);
                    tokio::spawn(async move {
                        let _ = serve(&mut sock, &routes, &hits).await;
                    });
                }
            }
        });

        Self {
            base_url: format!("http://{}/api/", addr),
            hits,
            handle,
        }
    }

    /// Paths requested so far, relative to `/api/`.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(
    sock: &mut TcpStream,
    routes: &Routes,
    hits: &Mutex<Vec<String>>,
) -> std::io::Result<()> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = sock.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }

    let head = String::from_utf8_lossy(&head);
    let target = head
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/");
    let path = target.strip_prefix("/api/").unwrap_or(target).to_string();
    hits.lock().unwrap().push(path.clone());

    let (status, body) = routes
        .get(&path)
        .cloned()
        .unwrap_or((404, r#"{"detail":"Not found."}"#.to_string()));
    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown");
    let resp = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    sock.write_all(resp.as_bytes()).await?;
    sock.shutdown().await
}
