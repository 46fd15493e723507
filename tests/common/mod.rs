//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use status_checker::health::Prober;

/// Start a mock endpoint that always answers with `status`.
#[allow(dead_code)]
pub async fn start_status_backend(status: u16) -> SocketAddr {
    start_programmable_backend(move || async move { (status, "ok".to_string()) }).await
}

/// Start a programmable mock endpoint on an ephemeral port.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;
                        let (status, body) = f().await;
                        let response = format!(
                            "HTTP/1.1 {} Mock\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
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

async fn read_request_head(socket: &mut TcpStream) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Prober that never goes through a proxy.
#[allow(dead_code)]
pub fn test_prober(timeout: Duration) -> Prober {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .no_proxy()
        .build()
        .unwrap();
    Prober::with_client(client)
}

#[allow(dead_code)]
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[allow(dead_code)]
pub fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("status-checker-it-{}", uuid::Uuid::new_v4()))
}

#[allow(dead_code)]
pub fn url_of(addr: SocketAddr) -> String {
    format!("http://{}/", addr)
}
