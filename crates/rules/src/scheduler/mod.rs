//! Notification scheduler: per-occurrence dedup and periodic dispatch.
//!
//! Each tick the [`ReminderScheduler`] pulls the event snapshot, finds the
//! alert-enabled events occurring today and sends one alert per occurrence.
//! The [`DeliveryLedger`] remembers which `(event id, date)` occurrences were
//! already dispatched so hourly re-runs on the same day stay silent; records
//! for past days are pruned at the start of each tick so the same event can
//! alert again on its next occurrence.
//!
//! [`ReminderRunner`] drives ticks on a fixed interval inside one tokio task
//! and hands back a [`RunnerHandle`] for extra ticks and clean shutdown.

mod core;
mod entry;
mod ledger;
mod report;
mod runner;


pub use self::core::ReminderScheduler;
pub use self::entry::{DeliveryRecord, OccurrenceKey};
pub use self::ledger::DeliveryLedger;
pub use self::report::{SkipReason, TickOutcome, TickReport};
pub use self::runner::{ReminderRunner, RunnerHandle, DEFAULT_TICK_INTERVAL};
