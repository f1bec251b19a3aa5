//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use devrelay::{DevServerConfig, HttpServer};

/// A request as the mock upstream saw it.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What the mock upstream answers with.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
    pub delay: Duration,
}

impl CannedResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn json(status: u16, body: &str) -> Self {
        Self::new(status, body).header("Content-Type", "application/json")
    }

    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Handle to a running mock upstream.
#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> CapturedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("upstream received no request")
    }
}

/// Start a mock upstream on an ephemeral port that records every request
/// and answers each with `response`.
pub async fn start_upstream(response: CannedResponse) -> MockUpstream {
    start_routed_upstream(move |_| response.clone()).await
}

/// Start a mock upstream whose answer depends on the request, e.g. a
/// redirect on one path and a body on another.
pub async fn start_routed_upstream<F>(respond: F) -> MockUpstream
where
    F: Fn(&CapturedRequest) -> CannedResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let upstream = MockUpstream {
        addr: listener.local_addr().unwrap(),
        calls: Arc::new(AtomicUsize::new(0)),
        requests: Arc::new(Mutex::new(Vec::new())),
    };

    let respond = Arc::new(respond);
    let handle = upstream.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handle = handle.clone();
                    let respond = respond.clone();
                    tokio::spawn(async move {
                        handle.calls.fetch_add(1, Ordering::SeqCst);
                        handle_connection(socket, respond.as_ref(), &handle).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    upstream
}

/// Read one request, record it, then answer. Recording happens before the
/// response is written so tests can inspect it as soon as the relay replies.
async fn handle_connection<F>(mut socket: TcpStream, respond: &F, handle: &MockUpstream)
where
    F: Fn(&CapturedRequest) -> CannedResponse,
{
    let Some(captured) = read_request(&mut socket).await else {
        return;
    };
    let response = respond(&captured);
    handle.requests.lock().unwrap().push(captured);

    tokio::time::sleep(response.delay).await;

    let mut out = format!("HTTP/1.1 {} Canned\r\n", response.status);
    for (name, value) in &response.headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        response.body.len()
    ));
    let mut bytes = out.into_bytes();
    bytes.extend_from_slice(&response.body);

    let _ = socket.write_all(&bytes).await;
    let _ = socket.shutdown().await;
}

/// Start an upstream that ignores HTTP framing: it reads the request, writes
/// each `(pause, bytes)` step in order, then closes the socket. Used for
/// malformed responses, truncated bodies and slow transfers.
pub async fn start_raw_upstream(script: Vec<(Duration, Vec<u8>)>) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let upstream = MockUpstream {
        addr: listener.local_addr().unwrap(),
        calls: Arc::new(AtomicUsize::new(0)),
        requests: Arc::new(Mutex::new(Vec::new())),
    };

    let script = Arc::new(script);
    let handle = upstream.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let handle = handle.clone();
            let script = script.clone();
            tokio::spawn(async move {
                handle.calls.fetch_add(1, Ordering::SeqCst);
                let Some(captured) = read_request(&mut socket).await else {
                    return;
                };
                handle.requests.lock().unwrap().push(captured);

                for (pause, bytes) in script.iter() {
                    tokio::time::sleep(*pause).await;
                    if socket.write_all(bytes).await.is_err() {
                        return;
                    }
                    let _ = socket.flush().await;
                }
                let _ = socket.shutdown().await;
            });
        }
    });

    upstream
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[head_end..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(CapturedRequest {
        method,
        target,
        headers,
        body,
    })
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Config pointing at `upstream` and serving `root`, on an ephemeral port.
pub fn test_config(upstream: &str, root: &Path) -> DevServerConfig {
    let mut config = DevServerConfig::default();
    config.listener.bind_address = "127.0.0.1".parse().unwrap();
    config.listener.port = 0;
    config.upstream.base_url = upstream.to_string();
    config.static_files.root = root.to_path_buf();
    config
}

/// Start devrelay in the background and return its address.
pub async fn start_relay(config: DevServerConfig) -> SocketAddr {
    let listener = TcpListener::bind(config.socket_addr()).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, std::future::pending()).await;
    });

    addr
}

/// A client that never pools or goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
