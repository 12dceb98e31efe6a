//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use cardcognition::config::ShellConfig;
use cardcognition::http::HttpServer;
use cardcognition::lifecycle::Shutdown;

/// A shell server bound to an ephemeral port.
pub struct RunningShell {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<ShellConfig>,
}

impl RunningShell {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningShell {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the shell with `config`; the bind address in it is ignored.
pub async fn start_shell(config: ShellConfig) -> RunningShell {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();

    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    RunningShell {
        addr,
        shutdown,
        config_updates,
    }
}

/// Client that never reuses connections or goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Start a programmable upstream. `f` receives the raw request head
/// (request line and headers) and returns status and body.
pub async fn start_upstream<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let head = read_head(&mut socket).await;
                let (status, body) = f(head).await;
                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    502 => "502 Bad Gateway",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Upstream that always answers 200 with `body`.
pub async fn start_fixed_upstream(body: &'static str) -> SocketAddr {
    start_upstream(move |_| async move { (200, body.to_string()) }).await
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let mut head_end = None;
    loop {
        if let Some(end) = head_end {
            let head = String::from_utf8_lossy(&buf[..end]).into_owned();
            if buf.len() >= end + content_length(&head) {
                return head;
            }
        }
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if head_end.is_none() {
                    head_end = buf.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4);
                }
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

/// Request path from a raw request head.
pub fn request_path(head: &str) -> String {
    head.split_whitespace().nth(1).unwrap_or_default().to_string()
}

/// Config pointing the gateway at `upstream`.
pub fn config_for(upstream: SocketAddr) -> ShellConfig {
    let mut config = ShellConfig::default();
    config.api.upstream = format!("http://{upstream}");
    config.retries.base_delay_ms = 10;
    config.retries.max_delay_ms = 50;
    config
}
