//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use api_gateway::config::GatewayConfig;
use api_gateway::limit::{CounterStore, MemoryCounterStore};
use api_gateway::GatewayServer;

/// Start a mock backend that returns a fixed response.
/// Binds an ephemeral port and returns the bound address.
pub async fn start_mock_backend(
    status_line: &'static str,
    content_type: &'static str,
    body: &'static str,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        // Drain the request head before answering
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_line,
                            content_type,
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

    addr
}

/// Start a backend that records each raw request head and answers 200.
/// Returns the address and the capture log.
#[allow(dead_code)]
pub async fn start_capture_backend() -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let log = captured.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let log = log.clone();
                    tokio::spawn(async move {
                        let mut head = Vec::new();
                        let mut buf = [0u8; 4096];
                        // Read until the end of the header block
                        loop {
                            match socket.read(&mut buf).await {
                                Ok(0) | Err(_) => break,
                                Ok(n) => {
                                    head.extend_from_slice(&buf[..n]);
                                    if head.windows(4).any(|w| w == b"\r\n\r\n") {
                                        break;
                                    }
                                }
                            }
                        }
                        log.lock()
                            .unwrap()
                            .push(String::from_utf8_lossy(&head).into_owned());
                        let body = r#"{"ok":true}"#;
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
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

    (addr, captured)
}

/// Start a backend that accepts connections and never responds.
#[allow(dead_code)]
pub async fn start_hanging_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    tokio::spawn(async move {
                        // Hold the connection open without answering
                        let _socket = socket;
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Base config for tests: rate limiting off unless a test turns it on.
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.rate_limit.enabled = false;
    config
}

/// Spawn a gateway with an in-memory counting store on an ephemeral port.
pub async fn spawn_gateway(config: GatewayConfig) -> SocketAddr {
    spawn_gateway_with_store(config, Arc::new(MemoryCounterStore::new())).await
}

/// Spawn a gateway with an explicit counting store on an ephemeral port.
pub async fn spawn_gateway_with_store(
    config: GatewayConfig,
    store: Arc<dyn CounterStore>,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = GatewayServer::with_store(config, store);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    // Give the server a beat to start accepting
    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}

/// A reqwest client that never reuses pooled connections between tests.
#[allow(dead_code)]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
