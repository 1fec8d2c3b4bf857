//! Periodic driver for [`ReminderScheduler`] ticks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::core::ReminderScheduler;
use super::report::TickOutcome;

/// Default time between ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(3_600);

/// Spawns the tick loop.
///
/// The loop ticks once immediately, then every `interval`. Ticks run one at
/// a time inside a single task; a shutdown request or an extra tick request
/// that arrives mid-tick is picked up once that tick has finished.
pub struct ReminderRunner;

impl ReminderRunner {
    /// Start ticking `scheduler` on the current tokio runtime.
    pub fn spawn(scheduler: ReminderScheduler, interval: Duration) -> RunnerHandle {
        let shutdown = Arc::new(Notify::new());
        let wake = Arc::new(Notify::new());
        let (outcome_tx, outcome_rx) = watch::channel(None);

        let task = tokio::spawn(Self::run_loop(
            scheduler,
            interval,
            shutdown.clone(),
            wake.clone(),
            outcome_tx,
        ));

        info!(interval_secs = interval.as_secs(), "reminder runner started");

        RunnerHandle {
            shutdown,
            wake,
            outcomes: outcome_rx,
            task: Some(task),
        }
    }

    async fn run_loop(
        mut scheduler: ReminderScheduler,
        interval: Duration,
        shutdown: Arc<Notify>,
        wake: Arc<Notify>,
        outcomes: watch::Sender<Option<TickOutcome>>,
    ) -> ReminderScheduler {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.notified() => break,
                _ = ticker.tick() => {}
                _ = wake.notified() => {}
            }

            // The tick runs outside `select!` so nothing can cancel it halfway.
            let outcome = scheduler.tick().await;
            outcomes.send_replace(Some(outcome));
        }

        info!("reminder runner stopped");
        scheduler
    }
}

/// Handle to a running tick loop.
///
/// Dropping the handle requests shutdown without waiting for it.
pub struct RunnerHandle {
    shutdown: Arc<Notify>,
    wake: Arc<Notify>,
    outcomes: watch::Receiver<Option<TickOutcome>>,
    task: Option<JoinHandle<ReminderScheduler>>,
}

impl RunnerHandle {
    /// Request an extra tick, e.g. after the snapshot changed.
    pub fn tick_now(&self) {
        self.wake.notify_one();
    }

    /// Receiver for the outcome of the most recent tick.
    pub fn outcomes(&self) -> watch::Receiver<Option<TickOutcome>> {
        self.outcomes.clone()
    }

    /// Stop ticking and wait for the loop to exit.
    ///
    /// Returns the scheduler with its ledger, or `None` if the loop panicked.
    pub async fn stop(mut self) -> Option<ReminderScheduler> {
        self.shutdown.notify_one();
        let task = self.task.take()?;
        match task.await {
            Ok(scheduler) => Some(scheduler),
            Err(e) => {
                warn!(error = %e, "reminder runner task failed");
                None
            }
        }
    }
}

impl Drop for RunnerHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.shutdown.notify_one();
        }
    }
}
