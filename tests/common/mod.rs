//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use incident_bridge::config::{BridgeConfig, NotifierConfig};

/// A request received by the mock service.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
}

impl CapturedRequest {
    #[allow(dead_code)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response chosen for the n-th request (0-based).
pub type Responder = dyn Fn(usize) -> (u16, Vec<(&'static str, String)>) + Send + Sync;

/// Start a mock incident-tracking service on an ephemeral port.
///
/// Every request is parsed and forwarded on the returned channel.
pub async fn start_mock_service<F>(respond: F) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedRequest>)
where
    F: Fn(usize) -> (u16, Vec<(&'static str, String)>) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let respond: Arc<Responder> = Arc::new(respond);
    let counter = Arc::new(AtomicUsize::new(0));

    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            let tx = tx.clone();
            let respond = respond.clone();
            let counter = counter.clone();

            tokio::spawn(async move {
                let (read_half, mut write_half) = socket.into_split();
                let mut reader = BufReader::new(read_half);

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).await.unwrap_or(0) == 0 {
                    return;
                }
                let mut parts = request_line.split_whitespace();
                let method = parts.next().unwrap_or_default().to_string();
                let path = parts.next().unwrap_or_default().to_string();

                let mut headers = Vec::new();
                let mut content_length = 0usize;
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                        break;
                    }
                    let line = line.trim_end();
                    if line.is_empty() {
                        break;
                    }
                    if let Some((k, v)) = line.split_once(':') {
                        let (k, v) = (k.trim().to_string(), v.trim().to_string());
                        if k.eq_ignore_ascii_case("content-length") {
                            content_length = v.parse().unwrap_or(0);
                        }
                        headers.push((k, v));
                    }
                }

                let mut body = vec![0u8; content_length];
                let _ = reader.read_exact(&mut body).await;
                let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);

                let n = counter.fetch_add(1, Ordering::SeqCst);
                let _ = tx.send(CapturedRequest {
                    method,
                    path,
                    headers,
                    body,
                });

                let (status, extra_headers) = respond(n);
                let payload = r#"{"id":"1"}"#;
                let mut response = format!(
                    "HTTP/1.1 {} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
                    status,
                    payload.len()
                );
                for (k, v) in extra_headers {
                    response.push_str(&format!("{}: {}\r\n", k, v));
                }
                response.push_str("\r\n");
                response.push_str(payload);

                let _ = write_half.write_all(response.as_bytes()).await;
                let _ = write_half.shutdown().await;
            });
        }
    });

    (addr, rx)
}

/// Config pointing at the mock service, with fast retries.
pub fn test_config(addr: SocketAddr) -> BridgeConfig {
    let mut config = BridgeConfig::new(
        NotifierConfig::new(42, "test-key", "test").with_source_path_prefix("github.com/org/app"),
    );
    config.delivery.host = format!("http://{}", addr);
    config.delivery.base_delay_ms = 10;
    config.delivery.max_delay_ms = 50;
    config.delivery.timeout_secs = 2;
    config
}

/// Receive the next captured request or fail after a timeout.
pub async fn next_request(rx: &mut mpsc::UnboundedReceiver<CapturedRequest>) -> CapturedRequest {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("mock service saw no request")
        .expect("mock service stopped")
}

/// Assert that no further request arrives within `wait`.
#[allow(dead_code)]
pub async fn assert_no_request(rx: &mut mpsc::UnboundedReceiver<CapturedRequest>, wait: Duration) {
    if let Ok(Some(request)) = tokio::time::timeout(wait, rx.recv()).await {
        panic!("unexpected request: {} {}", request.method, request.path);
    }
}
