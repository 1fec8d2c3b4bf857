//! [`ReminderScheduler`]: one evaluate-and-dispatch cycle per tick.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use datebook_connector::EventSource;
use datebook_core::{Clock, Event};
use datebook_notify::{Alert, Capability, Dispatcher};

use crate::recurrence::alerts_due_on;

use super::entry::OccurrenceKey;
use super::ledger::DeliveryLedger;
use super::report::{SkipReason, TickOutcome, TickReport};

/// Owns everything a tick touches: the last snapshot and the delivery ledger.
///
/// Collaborators (event source, sinks, capability, clock) are injected so a
/// host or a test controls every input. A tick takes `&mut self`, so two
/// ticks can never interleave.
pub struct ReminderScheduler {
    source: Box<dyn EventSource>,
    dispatcher: Dispatcher,
    capability: Box<dyn Capability>,
    clock: Box<dyn Clock>,
    ledger: DeliveryLedger,
    /// Last snapshot pulled successfully.
    snapshot: Option<Vec<Event>>,
}

impl ReminderScheduler {
    pub fn new(
        source: impl EventSource + 'static,
        dispatcher: Dispatcher,
        capability: impl Capability + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            source: Box::new(source),
            dispatcher,
            capability: Box::new(capability),
            clock: Box::new(clock),
            ledger: DeliveryLedger::new(),
            snapshot: None,
        }
    }

    /// Run one cycle. Never fails: problems are logged and reported.
    pub async fn tick(&mut self) -> TickOutcome {
        let Some(now) = self.clock.now() else {
            warn!("clock unavailable, skipping tick");
            return TickOutcome::Skipped(SkipReason::ClockUnavailable);
        };
        let today = now.date();

        self.refresh_snapshot().await;
        let Some(events) = self.snapshot.as_ref() else {
            warn!(%today, "no event snapshot available yet, skipping tick");
            return TickOutcome::Skipped(SkipReason::NoSnapshot);
        };

        let pruned = self.ledger.prune(today, events.iter().map(|e| &e.id));
        if pruned > 0 {
            debug!(%today, pruned, "pruned delivery records");
        }

        let capability = self.capability.state();
        let mut report = TickReport::new(today, capability, pruned);

        for event in alerts_due_on(events, today) {
            let key = OccurrenceKey::new(event.id.clone(), today);
            report.matched.push(key.clone());

            if self.ledger.contains(&key) {
                report.already_delivered.push(key);
                continue;
            }

            if !capability.is_granted() {
                debug!(event_id = %event.id, %capability, "delivery not granted, suppressing alert");
                report.suppressed.push(key);
                continue;
            }

            let alert = alert_for(event);
            let results = self.dispatcher.dispatch(&alert).await;
            let delivered = results.iter().any(|r| r.success);
            self.ledger.record(key.clone(), now, delivered);

            if delivered {
                debug!(event_id = %event.id, title = %event.title, "reminder dispatched");
                report.delivered.push(key);
            } else {
                warn!(event_id = %event.id, sinks = results.len(), "reminder not accepted by any sink");
                report.failed.push(key);
            }
        }

        info!(
            %today,
            matched = report.matched.len(),
            delivered = report.delivered.len(),
            already_delivered = report.already_delivered.len(),
            suppressed = report.suppressed.len(),
            failed = report.failed.len(),
            "tick complete"
        );

        TickOutcome::Completed(report)
    }

    /// Pull a fresh snapshot; keep the previous one if the pull fails.
    async fn refresh_snapshot(&mut self) {
        match self.source.snapshot().await {
            Ok(events) => self.snapshot = Some(events),
            Err(e) => warn!(
                source = self.source.source_name(),
                error = %e,
                cached = self.snapshot.is_some(),
                "event snapshot pull failed"
            ),
        }
    }

    /// Events occurring on `date` in the last snapshot, alerting flag ignored.
    pub fn events_on(&self, date: NaiveDate) -> Vec<&Event> {
        self.snapshot
            .as_deref()
            .map(|events| crate::recurrence::events_occurring_on(events, date))
            .unwrap_or_default()
    }

    pub fn ledger(&self) -> &DeliveryLedger {
        &self.ledger
    }

    pub fn snapshot(&self) -> Option<&[Event]> {
        self.snapshot.as_deref()
    }

    pub fn capability(&self) -> &dyn Capability {
        self.capability.as_ref()
    }
}

fn alert_for(event: &Event) -> Alert {
    Alert::new(
        event.title.clone(),
        event.description.clone().unwrap_or_default(),
        event.id.to_string(),
    )
}
