//! In-memory snapshot the host replaces between ticks.

use std::sync::{Arc, RwLock};

use datebook_core::Event;

use crate::source::{EventSource, SourceError};

/// Shared, wholesale-replaceable event snapshot.
///
/// Clones share the same snapshot: the host keeps one handle to call
/// [`replace`](SharedSnapshot::replace) and hands another to the scheduler.
/// There is no per-event mutation; every change swaps the whole list, so a
/// tick always sees one consistent version.
#[derive(Debug, Clone, Default)]
pub struct SharedSnapshot {
    inner: Arc<RwLock<Arc<Vec<Event>>>>,
}

impl SharedSnapshot {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(events))),
        }
    }

    /// Swap in a new snapshot. Takes effect on the next pull.
    pub fn replace(&self, events: Vec<Event>) {
        let next = Arc::new(events);
        match self.inner.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Current snapshot without copying.
    pub fn current(&self) -> Arc<Vec<Event>> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }
}

#[async_trait::async_trait]
impl EventSource for SharedSnapshot {
    async fn snapshot(&self) -> Result<Vec<Event>, SourceError> {
        Ok(self.current().as_ref().clone())
    }

    fn source_name(&self) -> &str {
        "memory"
    }
}
