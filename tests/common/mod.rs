//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use asset_proxy::config::ProxyConfig;
use asset_proxy::http::HttpServer;
use asset_proxy::lifecycle::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What a mock upstream sends back for one request.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
    pub delay: Duration,
}

impl MockResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            ..Self::ok(body)
        }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A running mock upstream.
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    completed: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockUpstream {
    /// Base URL, e.g. `http://127.0.0.1:41234`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request targets received so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of responses whose body was fully written to the socket.
    pub fn completed_writes(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

/// Start a programmable mock upstream on an ephemeral port.
///
/// `respond` receives the request target (path and query) of each request.
pub async fn start_programmable_backend<F>(respond: F) -> MockUpstream
where
    F: Fn(&str) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(AtomicUsize::new(0));
    let respond = Arc::new(respond);

    let (req_log, done) = (requests.clone(), completed.clone());
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let (respond, req_log, done) = (respond.clone(), req_log.clone(), done.clone());
            tokio::spawn(async move {
                let Some(target) = read_request_target(&mut socket).await else {
                    return;
                };
                req_log.lock().unwrap().push(target.clone());

                let response = respond(&target);
                tokio::time::sleep(response.delay).await;

                let mut head = format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                    response.status,
                    reason(response.status),
                    response.body.len()
                );
                for (name, value) in &response.headers {
                    head.push_str(&format!("{name}: {value}\r\n"));
                }
                head.push_str("\r\n");

                if socket.write_all(head.as_bytes()).await.is_err() {
                    return;
                }
                if socket.write_all(&response.body).await.is_ok() && socket.flush().await.is_ok() {
                    done.fetch_add(1, Ordering::SeqCst);
                }
                let _ = socket.shutdown().await;
            });
        }
    });

    MockUpstream {
        addr,
        requests,
        completed,
    }
}

/// Read the request head and return the request target from the request line.
async fn read_request_target(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf);
    head.lines()
        .next()?
        .split_whitespace()
        .nth(1)
        .map(String::from)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// A proxy running on an ephemeral port.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

#[allow(dead_code)]
impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Config pointing at the given upstream bases, with proxies disabled.
pub fn proxy_config(assets_api_host: &str, resizer_api_host: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstreams.assets_api_host = assets_api_host.into();
    config.upstreams.resizer_api_host = resizer_api_host.into();
    config.upstreams.system_proxy = false;
    config
}

/// Build and spawn the proxy server.
pub async fn start_proxy(config: ProxyConfig) -> TestProxy {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestProxy {
        addr,
        shutdown,
        handle,
    }
}

/// Test client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
