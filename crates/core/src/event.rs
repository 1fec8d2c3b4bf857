//! Event model shared by the matcher, the scheduler and the event sources.
//!
//! [`EventRecord`] is the loose wire shape returned by the event store;
//! [`Event`] is the validated form the engine works with. Conversion is the
//! only place an unrecognized recurrence kind can appear, and it is rejected
//! there, so a malformed record never reaches the matcher.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::EventError;

/// Opaque event identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Repetition rule attached to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    /// Occurs on the anchor date only.
    Once,
    /// Occurs every month on the anchor day.
    Monthly,
    /// Occurs every year on the anchor day and month.
    Yearly,
}

impl RecurrenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceKind::Once => "once",
            RecurrenceKind::Monthly => "monthly",
            RecurrenceKind::Yearly => "yearly",
        }
    }
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a kind string names none of the supported rules.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized recurrence kind `{0}`")]
pub struct UnknownRecurrence(pub String);

impl FromStr for RecurrenceKind {
    type Err = UnknownRecurrence;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "once" | "one-time" | "onetime" | "single" => Ok(RecurrenceKind::Once),
            "monthly" => Ok(RecurrenceKind::Monthly),
            "yearly" | "annual" | "annually" => Ok(RecurrenceKind::Yearly),
            _ => Err(UnknownRecurrence(s.to_string())),
        }
    }
}

/// A validated, dated event as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    /// Anchor date. The year only matters for [`RecurrenceKind::Once`].
    pub date: NaiveDate,
    pub recurrence: RecurrenceKind,
    pub description: Option<String>,
    /// When false the event is never dispatched, whatever its date.
    pub alerting_enabled: bool,
}

impl Event {
    /// Build an event with alerting enabled and no description.
    pub fn new(
        id: impl Into<EventId>,
        title: impl Into<String>,
        date: NaiveDate,
        recurrence: RecurrenceKind,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date,
            recurrence,
            description: None,
            alerting_enabled: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_alerting(mut self, enabled: bool) -> Self {
        self.alerting_enabled = enabled;
        self
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ── Wire record ───────────────────────────────────────────────

/// Event as returned by the store's list endpoint.
///
/// Field names follow the store's JSON (`type`, `notificationEnabled`).
/// `title`, `date` and `type` may be absent or null on the wire; such a
/// record still deserializes and is rejected by the conversion to [`Event`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// `YYYY-MM-DD`, or an ISO datetime whose date part is used.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_notification_enabled")]
    pub notification_enabled: bool,
}

fn default_notification_enabled() -> bool {
    true
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}

/// Parse the date part of a `YYYY-MM-DD[THH:MM:SS...]` string.
pub fn parse_event_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let date_part = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

impl TryFrom<EventRecord> for Event {
    type Error = EventError;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        let id = record.id;
        let title = record
            .title
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if title.is_empty() {
            return Err(EventError::EmptyTitle(id));
        }

        let missing = |field: &'static str| EventError::MissingField {
            id: id.clone(),
            field,
        };

        let raw_date = record.date.ok_or_else(|| missing("date"))?;
        let date = parse_event_date(&raw_date).ok_or_else(|| EventError::InvalidDate {
            id: id.clone(),
            value: raw_date.clone(),
        })?;

        let raw_kind = record.kind.ok_or_else(|| missing("type"))?;
        let recurrence =
            raw_kind
                .parse::<RecurrenceKind>()
                .map_err(|e| EventError::UnknownRecurrence {
                    id: id.clone(),
                    value: e.0,
                })?;

        Ok(Event {
            id: EventId(id),
            title,
            date,
            recurrence,
            description: record.description.filter(|d| !d.trim().is_empty()),
            alerting_enabled: record.notification_enabled,
        })
    }
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.to_string(),
            title: Some(event.title.clone()),
            date: Some(event.date.format("%Y-%m-%d").to_string()),
            kind: Some(event.recurrence.to_string()),
            description: event.description.clone(),
            notification_enabled: event.alerting_enabled,
        }
    }
}

/// Convert a batch of wire records into events, keeping input order.
///
/// Records that fail validation are dropped and logged; they never match.
pub fn parse_records(records: Vec<EventRecord>) -> Vec<Event> {
    records
        .into_iter()
        .filter_map(|record| match Event::try_from(record) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed event record");
                None
            }
        })
        .collect()
}

/// Decode and validate raw JSON records one at a time, keeping input order.
///
/// A record that is not even a valid [`EventRecord`] (missing id, wrong
/// field types) is dropped like any other malformed record.
pub fn parse_values(values: Vec<serde_json::Value>) -> Vec<Event> {
    let records = values
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, value)| match serde_json::from_value::<EventRecord>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping undecodable event record");
                    None
                }
            },
        )
        .collect();
    parse_records(records)
}

/// Body of the store's list endpoint: `{"events": [...]}`.
///
/// Records stay raw JSON until [`into_events`](EventList::into_events) so one
/// bad record cannot fail the whole body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventList {
    #[serde(default)]
    pub events: Vec<serde_json::Value>,
}

impl EventList {
    pub fn into_events(self) -> Vec<Event> {
        parse_values(self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str) -> EventRecord {
        EventRecord {
            id: "7".to_string(),
            title: Some("Dentist".to_string()),
            date: Some("2024-03-15".to_string()),
            kind: Some(kind.to_string()),
            description: None,
            notification_enabled: true,
        }
    }

    #[test]
    fn recurrence_kind_parses_aliases_case_insensitively() {
        assert_eq!("Once".parse::<RecurrenceKind>(), Ok(RecurrenceKind::Once));
        assert_eq!(" MONTHLY ".parse::<RecurrenceKind>(), Ok(RecurrenceKind::Monthly));
        assert_eq!("annual".parse::<RecurrenceKind>(), Ok(RecurrenceKind::Yearly));
        assert!("weekly".parse::<RecurrenceKind>().is_err());
        assert!("".parse::<RecurrenceKind>().is_err());
    }

    #[test]
    fn unknown_recurrence_is_a_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(UnknownRecurrence("weekly".to_string()));
        assert_eq!(err.to_string(), "unrecognized recurrence kind `weekly`");
    }

    #[test]
    fn record_with_unknown_kind_is_rejected() {
        let err = Event::try_from(record("weekly")).unwrap_err();
        assert_eq!(
            err,
            EventError::UnknownRecurrence {
                id: "7".to_string(),
                value: "weekly".to_string()
            }
        );
    }

    #[test]
    fn record_with_invalid_date_is_rejected() {
        let mut r = record("once");
        r.date = Some("2023-02-29".to_string());
        assert!(matches!(
            Event::try_from(r),
            Err(EventError::InvalidDate { .. })
        ));
    }

    #[test]
    fn record_with_blank_title_is_rejected() {
        let mut r = record("once");
        r.title = Some("   ".to_string());
        assert_eq!(
            Event::try_from(r),
            Err(EventError::EmptyTitle("7".to_string()))
        );
    }

    #[test]
    fn record_without_date_or_kind_is_rejected() {
        let mut no_date = record("once");
        no_date.date = None;
        assert_eq!(
            Event::try_from(no_date),
            Err(EventError::MissingField {
                id: "7".to_string(),
                field: "date"
            })
        );

        let mut no_kind = record("once");
        no_kind.kind = None;
        assert!(matches!(
            Event::try_from(no_kind),
            Err(EventError::MissingField { field: "type", .. })
        ));
    }

    #[test]
    fn list_keeps_good_records_around_bad_ones() {
        let json = r#"{"events": [
            {"id": 1, "title": "Rent", "date": "2024-01-31", "type": "monthly"},
            {"id": 2, "title": "No date", "type": "once"},
            {"id": 3, "title": "Null kind", "date": "2024-01-01", "type": null},
            {"title": "No id", "date": "2024-01-01", "type": "once"},
            {"id": 5, "title": "Wrong flag", "date": "2024-01-01", "type": "once",
             "notificationEnabled": "yes"},
            {"id": 6, "title": "Trip", "date": "2024-06-01", "type": "once"}
        ]}"#;
        let list: EventList = serde_json::from_str(json).unwrap();
        let ids: Vec<String> = list
            .into_events()
            .into_iter()
            .map(|e| e.id.to_string())
            .collect();
        assert_eq!(ids, vec!["1", "6"]);
    }

    #[test]
    fn datetime_string_uses_date_part() {
        assert_eq!(
            parse_event_date("2024-03-15T00:00:00"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(parse_event_date("15/03/2024"), None);
    }

    #[test]
    fn store_json_deserializes_with_defaults() {
        let json = r#"{"events": [
            {"id": 1, "title": "Rent", "date": "2024-01-31", "type": "monthly"},
            {"id": "2", "title": "Trip", "date": "2024-06-01", "type": "once",
             "description": "pack", "notificationEnabled": false}
        ]}"#;
        let list: EventList = serde_json::from_str(json).unwrap();
        let events = list.into_events();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id.as_str(), "1");
        assert!(events[0].alerting_enabled);
        assert_eq!(events[0].description, None);
        assert_eq!(events[1].recurrence, RecurrenceKind::Once);
        assert_eq!(events[1].description.as_deref(), Some("pack"));
        assert!(!events[1].alerting_enabled);
    }

    #[test]
    fn parse_records_drops_malformed_and_keeps_order() {
        let mut bad = record("fortnightly");
        bad.id = "bad".to_string();
        let mut second = record("yearly");
        second.id = "8".to_string();

        let events = parse_records(vec![record("once"), bad, second]);
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["7", "8"]);
    }

    #[test]
    fn event_converts_back_to_record() {
        let event = Event::new(
            "3",
            "Anniversary",
            NaiveDate::from_ymd_opt(2019, 9, 1).unwrap(),
            RecurrenceKind::Yearly,
        );
        let rec = EventRecord::from(&event);
        assert_eq!(rec.kind.as_deref(), Some("yearly"));
        assert_eq!(rec.date.as_deref(), Some("2019-09-01"));
        assert_eq!(Event::try_from(rec).unwrap(), event);
    }
}
