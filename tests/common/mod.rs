//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use fx_quote_service::{HttpServer, QuoteFetcher, QuoteStore, ServiceConfig, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A running fake upstream.
pub struct Upstream {
    pub addr: SocketAddr,
    hits: Arc<AtomicU32>,
}

impl Upstream {
    /// Quote URL on this upstream.
    #[allow(dead_code)]
    pub fn url(&self) -> String {
        format!("http://{}/json/last/USD-BRL", self.addr)
    }

    /// Requests fully received so far.
    #[allow(dead_code)]
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Upstream body for a USDBRL bid.
#[allow(dead_code)]
pub fn usdbrl(bid: &str) -> String {
    format!(r#"{{"USDBRL":{{"code":"USD","codein":"BRL","bid":"{bid}","ask":"5.50"}}}}"#)
}

async fn read_request_head(socket: &mut TcpStream) -> bool {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return false,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    return true;
                }
            }
        }
    }
}

fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        404 => "404 Not Found",
        429 => "429 Too Many Requests",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Start a programmable upstream on an ephemeral port.
///
/// `f` receives the zero-based index of the request and returns status and body.
/// It may sleep to simulate a slow upstream.
#[allow(dead_code)]
pub async fn start_programmable_upstream<F, Fut>(f: F) -> Upstream
where
    F: Fn(u32) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let f = Arc::new(f);

    let counter = hits.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let counter = counter.clone();
                    tokio::spawn(async move {
                        if !read_request_head(&mut socket).await {
                            return;
                        }
                        let index = counter.fetch_add(1, Ordering::SeqCst);
                        let (status, body) = f(index).await;

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_line(status),
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    Upstream { addr, hits }
}

/// Start an upstream that always answers with the same status and body.
#[allow(dead_code)]
pub async fn start_fixed_upstream(status: u16, body: String) -> Upstream {
    start_programmable_upstream(move |_| {
        let body = body.clone();
        async move { (status, body) }
    })
    .await
}

/// Run the quote service on an ephemeral port.
#[allow(dead_code)]
pub async fn spawn_service(
    config: ServiceConfig,
    fetcher: Arc<dyn QuoteFetcher>,
    store: Arc<dyn QuoteStore>,
) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, fetcher, store);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// A reqwest client that never pools or proxies.
#[allow(dead_code)]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
