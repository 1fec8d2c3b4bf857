//! Tick results.

use chrono::NaiveDate;
use datebook_notify::CapabilityState;

use super::entry::OccurrenceKey;

/// Why a tick did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The clock could not be read.
    ClockUnavailable,
    /// No snapshot has ever been loaded.
    NoSnapshot,
}

/// What one tick decided for today's occurrences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub today: NaiveDate,
    /// Capability state read at the start of the tick.
    pub capability: CapabilityState,
    /// Alert-enabled events occurring today, in snapshot order.
    pub matched: Vec<OccurrenceKey>,
    /// Sent this tick and accepted by at least one sink.
    pub delivered: Vec<OccurrenceKey>,
    /// Dispatched by an earlier tick today.
    pub already_delivered: Vec<OccurrenceKey>,
    /// Would have fired, but delivery is not granted.
    pub suppressed: Vec<OccurrenceKey>,
    /// Sent this tick but rejected by every sink. Not retried.
    pub failed: Vec<OccurrenceKey>,
    /// Delivery records dropped before matching.
    pub pruned: usize,
}

impl TickReport {
    pub(crate) fn new(today: NaiveDate, capability: CapabilityState, pruned: usize) -> Self {
        Self {
            today,
            capability,
            matched: Vec::new(),
            delivered: Vec::new(),
            already_delivered: Vec::new(),
            suppressed: Vec::new(),
            failed: Vec::new(),
            pruned,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Completed(TickReport),
    Skipped(SkipReason),
}

impl TickOutcome {
    pub fn report(&self) -> Option<&TickReport> {
        match self {
            TickOutcome::Completed(report) => Some(report),
            TickOutcome::Skipped(_) => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, TickOutcome::Skipped(_))
    }
}
