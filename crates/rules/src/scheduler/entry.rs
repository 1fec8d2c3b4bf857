//! Occurrence identity and delivery record types.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use datebook_core::EventId;

/// A specific dated instance of an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OccurrenceKey {
    pub event_id: EventId,
    pub date: NaiveDate,
}

impl OccurrenceKey {
    pub fn new(event_id: EventId, date: NaiveDate) -> Self {
        Self { event_id, date }
    }
}

impl fmt::Display for OccurrenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.event_id, self.date)
    }
}

/// Memory of one dispatched occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRecord {
    pub key: OccurrenceKey,
    /// Local time of the dispatch.
    pub dispatched_at: NaiveDateTime,
    /// Whether at least one sink accepted the alert.
    pub delivered: bool,
}
