//! [`DeliveryLedger`]: occurrences already dispatched in this process.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use datebook_core::EventId;

use super::entry::{DeliveryRecord, OccurrenceKey};

/// Process-lifetime set of dispatched occurrences. Never persisted.
#[derive(Debug, Default)]
pub struct DeliveryLedger {
    records: HashMap<OccurrenceKey, DeliveryRecord>,
}

impl DeliveryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &OccurrenceKey) -> bool {
        self.records.contains_key(key)
    }

    /// Record a dispatch. The first record for a key wins.
    pub fn record(&mut self, key: OccurrenceKey, dispatched_at: NaiveDateTime, delivered: bool) {
        self.records
            .entry(key.clone())
            .or_insert(DeliveryRecord {
                key,
                dispatched_at,
                delivered,
            });
    }

    /// Drop records whose date is not `today` or whose event left the snapshot.
    ///
    /// Returns the number of records removed.
    pub fn prune<'a, I>(&mut self, today: NaiveDate, live_ids: I) -> usize
    where
        I: IntoIterator<Item = &'a EventId>,
    {
        let live: HashSet<&EventId> = live_ids.into_iter().collect();
        let before = self.records.len();
        self.records
            .retain(|key, _| key.date == today && live.contains(&key.event_id));
        before - self.records.len()
    }

    pub fn get(&self, key: &OccurrenceKey) -> Option<&DeliveryRecord> {
        self.records.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeliveryRecord> {
        self.records.values()
    }

    /// Number of tracked occurrences.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
