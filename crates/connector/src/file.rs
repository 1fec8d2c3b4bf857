//! JSON file source.

use std::path::{Path, PathBuf};

use datebook_core::{parse_values, Event, EventList};
use serde::Deserialize;

use crate::source::{EventSource, SourceError};

/// Accepted file layouts: the store's list body or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum FilePayload {
    List(EventList),
    Records(Vec<serde_json::Value>),
}

/// Reads events from a JSON file on every pull.
///
/// The file holds either `{"events": [...]}` or a bare array of records.
/// Malformed records are skipped; a missing or unparseable file is an error.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse a JSON document in either accepted layout.
///
/// Only a document that is not JSON, or not one of the two layouts, is an
/// error. Bad records inside it are dropped one by one.
pub fn parse_events_json(json: &str) -> Result<Vec<Event>, SourceError> {
    let events = match serde_json::from_str::<FilePayload>(json)? {
        FilePayload::List(list) => list.into_events(),
        FilePayload::Records(records) => parse_values(records),
    };
    Ok(events)
}

#[async_trait::async_trait]
impl EventSource for FileSource {
    async fn snapshot(&self) -> Result<Vec<Event>, SourceError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let events = parse_events_json(&content)?;
        tracing::debug!(path = %self.path.display(), count = events.len(), "loaded events file");
        Ok(events)
    }

    fn source_name(&self) -> &str {
        "file"
    }
}
