//! Generic HTTP webhook sink.
//!
//! Delivers alerts as JSON payloads (`{"title", "body", "tag"}`) to a
//! configured URL with optional custom headers.

use std::collections::HashMap;
use std::time::Duration;

use crate::traits::{Alert, AlertSink, NotifyError};

/// Delivers alerts as JSON over HTTP to a configured endpoint.
#[derive(Debug)]
pub struct WebhookSink {
    url: String,
    method: reqwest::Method,
    /// Custom headers to include on every request.
    headers: HashMap<String, String>,
    /// Shared HTTP client (connection pooling).
    client: reqwest::Client,
}

impl WebhookSink {
    /// Create a `POST` webhook sink with the given request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let url = url.into();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(NotifyError::Config(format!(
                "webhook url must be http(s), got: {url}"
            )));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            url,
            method: reqwest::Method::POST,
            headers: HashMap::new(),
            client,
        })
    }

    /// Override the HTTP method (e.g. `"PUT"`). Case-insensitive.
    pub fn with_method(mut self, method: &str) -> Result<Self, NotifyError> {
        self.method = method
            .to_uppercase()
            .parse::<reqwest::Method>()
            .map_err(|_| NotifyError::Config(format!("invalid HTTP method: {method}")))?;
        Ok(self)
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl AlertSink for WebhookSink {
    async fn deliver(&self, alert: &Alert) -> Result<(), NotifyError> {
        let mut request = self
            .client
            .request(self.method.clone(), &self.url)
            .json(alert);

        for (key, value) in &self.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(
                url = %self.url,
                %status,
                body = %body,
                "webhook returned non-2xx status"
            );
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(
            url = %self.url,
            method = %self.method,
            status = %status,
            "webhook alert delivered"
        );

        Ok(())
    }

    fn channel_name(&self) -> &str {
        "webhook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Accept one HTTP request, answer with `status_line`, return the raw request.
    async fn serve_once(status_line: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/hook", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                if request_complete(&raw) {
                    break;
                }
            }
            let response = format!("HTTP/1.1 {status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&raw).to_string()
        });

        (url, handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        body.len() >= length
    }

    #[test]
    fn rejects_non_http_url() {
        let err = WebhookSink::new("ftp://example.com", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, NotifyError::Config(_)));
    }

    #[test]
    fn method_override_is_case_insensitive() {
        let sink = WebhookSink::new("https://example.com", Duration::from_secs(1))
            .unwrap()
            .with_method("put")
            .unwrap();
        assert_eq!(sink.method, reqwest::Method::PUT);
        assert_eq!(sink.channel_name(), "webhook");
    }

    #[test]
    fn invalid_method_is_rejected() {
        let result = WebhookSink::new("https://example.com", Duration::from_secs(1))
            .unwrap()
            .with_method("NOT A METHOD");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn delivers_alert_as_json() {
        let (url, server) = serve_once("204 No Content").await;
        let sink = WebhookSink::new(url, Duration::from_secs(5))
            .unwrap()
            .with_header("X-Api-Key", "k1");

        sink.deliver(&Alert::new("Mom's birthday", "call her", "42"))
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /hook"));
        assert!(request.to_ascii_lowercase().contains("x-api-key: k1"));
        assert!(request.contains(r#""title":"Mom's birthday""#));
        assert!(request.contains(r#""tag":"42""#));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (url, server) = serve_once("503 Service Unavailable").await;
        let sink = WebhookSink::new(url, Duration::from_secs(5)).unwrap();

        let err = sink.deliver(&Alert::new("x", "", "1")).await.unwrap_err();
        assert!(matches!(err, NotifyError::Status { status: 503, .. }));
        server.await.unwrap();
    }
}
