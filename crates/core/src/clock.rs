//! Injectable local wall clock.

use std::sync::{Arc, RwLock};

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source of the current local date/time.
///
/// Returns `None` when the time cannot be read; callers treat that as a
/// skipped cycle rather than an error.
pub trait Clock: Send + Sync {
    fn now(&self) -> Option<NaiveDateTime>;

    /// Current local calendar date.
    fn today(&self) -> Option<NaiveDate> {
        self.now().map(|dt| dt.date())
    }
}

/// Reads the operating system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Option<NaiveDateTime> {
        Some(Local::now().naive_local())
    }
}

/// Settable clock for tests and deterministic replay.
///
/// Clones share the same instant, so a test can keep one handle and move
/// time forward while the scheduler holds another.
#[derive(Debug, Clone, Default)]
pub struct FixedClock {
    now: Arc<RwLock<Option<NaiveDateTime>>>,
}

impl FixedClock {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(RwLock::new(Some(now))),
        }
    }

    /// Clock fixed at midnight of `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self::at(date.and_time(chrono::NaiveTime::MIN))
    }

    /// A clock that cannot be read.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn set(&self, now: NaiveDateTime) {
        if let Ok(mut guard) = self.now.write() {
            *guard = Some(now);
        }
    }

    pub fn set_date(&self, date: NaiveDate) {
        self.set(date.and_time(chrono::NaiveTime::MIN));
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.now.write() {
            *guard = None;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Option<NaiveDateTime> {
        self.now.read().ok().and_then(|guard| *guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_clones_share_time() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let clock = FixedClock::on(date);
        let other = clock.clone();

        other.set_date(date.succ_opt().unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 16));
    }

    #[test]
    fn unavailable_clock_has_no_today() {
        let clock = FixedClock::unavailable();
        assert_eq!(clock.today(), None);
        clock.set_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(clock.today().is_some());
        clock.clear();
        assert!(clock.now().is_none());
    }

    #[test]
    fn system_clock_reads_time() {
        assert!(SystemClock.today().is_some());
    }
}
