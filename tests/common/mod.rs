//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use aare_fetch::config::AppConfig;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// Start a programmable mock upstream.
///
/// `f` receives the request target (path and query string) and returns the
/// status code and JSON body to send back.
pub async fn start_programmable_upstream<F, Fut>(addr: SocketAddr, f: F)
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await.unwrap();
    let f = std::sync::Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let (reader, mut writer) = socket.into_split();
                        let mut reader = BufReader::new(reader);

                        let mut request_line = String::new();
                        if reader.read_line(&mut request_line).await.is_err() {
                            return;
                        }
                        // Drain headers up to the blank line.
                        let mut line = String::new();
                        loop {
                            line.clear();
                            match reader.read_line(&mut line).await {
                                Ok(0) | Err(_) => break,
                                Ok(_) if line == "\r\n" => break,
                                Ok(_) => {}
                            }
                        }

                        let target = request_line
                            .split_whitespace()
                            .nth(1)
                            .unwrap_or("/")
                            .to_string();
                        let (status, body) = f(target).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
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
                        let _ = writer.write_all(response.as_bytes()).await;
                        let _ = writer.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Config pointing at a local mock upstream with rate limiting disabled.
pub fn local_config(addr: SocketAddr) -> AppConfig {
    let mut config = AppConfig::default();
    config.upstream.base_url = format!("http://{}", addr);
    config.upstream.app_name = "aare-fetch-tests".into();
    config.upstream.app_version = "0.0.1".into();
    config.upstream.request_timeout_secs = 1;
    config.upstream.max_idle_per_host = 0;
    config.rate_limit.min_interval_ms = 0;
    config
}

/// Query parameter `name` from a request target.
pub fn query_param(target: &str, name: &str) -> Option<String> {
    let url = url::Url::parse(&format!("http://localhost{}", target)).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}
