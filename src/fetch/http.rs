use async_trait::async_trait;
use color_eyre::Result;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::{ContentFetcher, FetchError};

pub const DEFAULT_BLOCK_PATH: &str = "/api/proposals/{proposal}/blocks/{block}";

const PROPOSAL_PLACEHOLDER: &str = "{proposal}";
const BLOCK_PLACEHOLDER: &str = "{block}";

/// Body of both successful (`html`) and failed (`detail`) block responses.
#[derive(Debug, Deserialize)]
struct BlockPayload {
    html: Option<String>,
    detail: Option<serde_json::Value>,
}

/// Fetches rendered blocks from the proposal API over HTTP.
pub struct HttpBlockFetcher {
    client: Client,
    base_url: Url,
    block_path: String,
}

impl HttpBlockFetcher {
    pub fn new(base_url: &str, block_path: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;
        Self::with_client(client, base_url, block_path)
    }

    pub fn with_client(client: Client, base_url: &str, block_path: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(color_eyre::eyre::eyre!(
                "{} cannot be used as a base URL",
                base_url
            ));
        }
        Ok(Self {
            client,
            base_url,
            block_path: block_path.to_string(),
        })
    }

    /// Builds the block URL, substituting placeholders segment by segment so
    /// codes are percent-encoded.
    pub fn block_url(&self, proposal_code: &str, block_code: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                FetchError::Transport(format!("{} cannot be used as a base URL", self.base_url))
            })?;
            segments.pop_if_empty();
            for segment in self.block_path.split('/').filter(|s| !s.is_empty()) {
                let segment = match segment {
                    PROPOSAL_PLACEHOLDER => proposal_code,
                    BLOCK_PLACEHOLDER => block_code,
                    other => other,
                };
                segments.push(segment);
            }
        }
        Ok(url)
    }

    async fn request(&self, url: Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| FetchError::Transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| FetchError::Transport(error.to_string()))?;
        let payload = serde_json::from_slice::<BlockPayload>(&body).ok();

        if status.is_success() {
            return payload
                .and_then(|payload| payload.html)
                .ok_or_else(|| FetchError::Transport("malformed block response".to_string()));
        }

        let detail = payload
            .and_then(|payload| payload.detail)
            .map(detail_text)
            .unwrap_or_else(|| status_line(status));
        Err(FetchError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}

fn detail_text(detail: serde_json::Value) -> String {
    match detail {
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    }
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

#[async_trait]
impl ContentFetcher for HttpBlockFetcher {
    async fn fetch(
        &self,
        proposal_code: &str,
        block_code: &str,
        cancel: CancellationToken,
    ) -> Result<String, FetchError> {
        let url = self.block_url(proposal_code, block_code)?;
        tracing::debug!(%url, "requesting block");
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.request(url) => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn fetcher(base_url: &str) -> HttpBlockFetcher {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpBlockFetcher::with_client(client, base_url, DEFAULT_BLOCK_PATH).unwrap()
    }

    async fn read_request_head(socket: &mut tokio::net::TcpStream) -> String {
        let mut request = Vec::new();
        let mut buffer = [0u8; 1024];
        loop {
            let read = socket.read(&mut buffer).await.unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buffer[..read]);
            if request.windows(4).any(|window| window == b"\r\n\r\n") {
                break;
            }
        }
        String::from_utf8_lossy(&request).into_owned()
    }

    /// Serves one canned response and hands back the request head it received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let head = read_request_head(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            head
        });
        (format!("http://{address}"), handle)
    }

    #[test]
    fn test_block_url_substitutes_and_encodes_segments() {
        let fetcher = fetcher("http://localhost:8000/salt/");
        let url = fetcher.block_url("2024-1 SCI", "block/1").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/salt/api/proposals/2024-1%20SCI/blocks/block%2F1"
        );
    }

    #[test]
    fn test_block_url_without_base_path() {
        let fetcher = fetcher("http://localhost:8000");
        let url = fetcher.block_url("P1", "b1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/proposals/P1/blocks/b1");
    }

    #[test]
    fn test_rejects_non_base_url() {
        let client = Client::new();
        assert!(HttpBlockFetcher::with_client(client, "mailto:someone", DEFAULT_BLOCK_PATH).is_err());
    }

    #[tokio::test]
    async fn test_fetch_returns_html() {
        let (base_url, server) = serve_once("200 OK", r#"{"html":"<p>one</p>"}"#).await;
        let html = fetcher(&base_url)
            .fetch("P1", "b1", CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(html, "<p>one</p>");

        let head = server.await.unwrap();
        assert!(head.starts_with("GET /api/proposals/P1/blocks/b1 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_fetch_reports_backend_detail() {
        let (base_url, _server) = serve_once("404 Not Found", r#"{"detail":"not found"}"#).await;
        let error = fetcher(&base_url)
            .fetch("P1", "b2", CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(
            error,
            FetchError::Rejected {
                status: 404,
                detail: "not found".to_string()
            }
        );
        assert_eq!(error.to_string(), "not found");
    }

    #[tokio::test]
    async fn test_fetch_falls_back_to_status_line() {
        let (base_url, _server) = serve_once("500 Internal Server Error", "oops").await;
        let error = fetcher(&base_url)
            .fetch("P1", "b1", CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "500 Internal Server Error");
    }

    #[tokio::test]
    async fn test_success_without_html_is_malformed() {
        let (base_url, _server) = serve_once("200 OK", r#"{"content":"x"}"#).await;
        let error = fetcher(&base_url)
            .fetch("P1", "b1", CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(error, FetchError::Transport("malformed block response".to_string()));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let error = fetcher(&format!("http://{address}"))
            .fetch("P1", "b1", CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(error, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_cancellation_abandons_slow_request() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let _ = read_request_head(&mut socket).await;
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let error = fetcher(&format!("http://{address}"))
            .fetch("P1", "b1", cancel)
            .await
            .unwrap_err();
        assert!(error.is_cancelled());
    }
}
