//! Client for the event store's list endpoint.

use std::time::Duration;

use datebook_core::{Event, EventList};

use crate::source::{EventSource, SourceError};

/// Pulls the event catalog with `GET {url}`.
///
/// The store answers `{"events": [...]}` ordered by date.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl EventSource for HttpSource {
    async fn snapshot(&self) -> Result<Vec<Event>, SourceError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, %status, "event store returned non-2xx status");
            return Err(SourceError::Status(status.as_u16()));
        }

        let list: EventList = response.json().await?;
        let events = list.into_events();
        tracing::debug!(url = %self.url, count = events.len(), "fetched events");
        Ok(events)
    }

    fn source_name(&self) -> &str {
        "http"
    }
}
