//! Recurrence matching and reminder scheduling.
//!
//! This crate provides:
//! - Pure recurrence matching for one-off, monthly and yearly events
//! - Upcoming-occurrence queries for display
//! - A tick-based scheduler that dispatches each occurrence exactly once
//! - A tokio runner with start/stop handle

pub mod recurrence;
pub mod scheduler;

pub use recurrence::{
    alerts_due_on, events_occurring_on, next_occurrence, occurs_on, upcoming, Upcoming,
};
pub use scheduler::{
    DeliveryLedger, OccurrenceKey, ReminderRunner, ReminderScheduler, RunnerHandle, SkipReason,
    TickOutcome, TickReport,
};
