use datebook_core::Event;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("event store returned status {0}")]
    Status(u16),

    #[error("invalid event payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Pull-based provider of the current event catalog.
#[async_trait::async_trait]
pub trait EventSource: Send + Sync {
    /// Return the full current snapshot, in store order.
    async fn snapshot(&self) -> Result<Vec<Event>, SourceError>;

    /// Short label for logs (e.g., "file", "http").
    fn source_name(&self) -> &str;
}

#[async_trait::async_trait]
impl<S: EventSource + ?Sized> EventSource for std::sync::Arc<S> {
    async fn snapshot(&self) -> Result<Vec<Event>, SourceError> {
        (**self).snapshot().await
    }

    fn source_name(&self) -> &str {
        (**self).source_name()
    }
}
