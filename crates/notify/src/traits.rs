//! AlertSink trait definition and shared error types.

use serde::Serialize;

/// Errors that can occur during alert delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sink returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("sink unavailable: {0}")]
    Unavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Payload handed to a sink for one occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub title: String,
    /// Event description, or empty.
    pub body: String,
    /// Event id; lets a host that dedupes by tag layer under the engine's own dedup.
    pub tag: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, body: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            tag: tag.into(),
        }
    }
}

/// Trait for alert channel implementations.
#[async_trait::async_trait]
pub trait AlertSink: Send + Sync {
    /// Surface an alert to the user through this channel.
    async fn deliver(&self, alert: &Alert) -> Result<(), NotifyError>;

    /// Human-readable name for this channel (e.g., "log", "webhook").
    fn channel_name(&self) -> &str;
}

/// Result of dispatching an alert to a single sink.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub channel: String,
    pub tag: String,
    pub success: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
}
