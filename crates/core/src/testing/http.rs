//! Minimal HTTP server for tests.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Spawns a loopback HTTP server that answers every request with `200 OK`
/// and the given body (headers only for HEAD probes).
///
/// Returns the base URL and the server task handle; abort the handle when
/// done.
pub async fn spawn_http_server(body: Vec<u8>) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read local addr");

    let handle = tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let body = body.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let head_only = request.starts_with("HEAD ");

                let header = format!(
                    "HTTP/1.1 200 OK\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(header.as_bytes()).await;
                if !head_only {
                    let _ = socket.write_all(&body).await;
                }
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{}", addr), handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_body_on_get() {
        let (url, server) = spawn_http_server(b"hello".to_vec()).await;

        let response = reqwest::get(&url).await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(response.bytes().await.unwrap().as_ref(), b"hello");

        server.abort();
    }

    #[tokio::test]
    async fn test_answers_head_probes() {
        let (url, server) = spawn_http_server(b"hello".to_vec()).await;

        let client = reqwest::Client::new();
        let response = client.head(&url).send().await.unwrap();
        assert!(response.status().is_success());

        server.abort();
    }
}
