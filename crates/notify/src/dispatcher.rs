//! Fans an alert out to every configured sink.
//!
//! Individual sink failures don't block other sinks. The dispatcher never
//! retries; callers decide what a failed delivery means.

use crate::traits::{Alert, AlertSink, DispatchResult};

/// Dispatches alerts to a fixed list of sinks, in order.
pub struct Dispatcher {
    sinks: Vec<Box<dyn AlertSink>>,
}

impl Dispatcher {
    pub fn new(sinks: Vec<Box<dyn AlertSink>>) -> Self {
        Self { sinks }
    }

    /// Create a dispatcher with no sinks.
    pub fn empty() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Create a dispatcher with a single sink.
    pub fn single(sink: impl AlertSink + 'static) -> Self {
        Self {
            sinks: vec![Box::new(sink)],
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn AlertSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Deliver an alert to every sink. Returns one result per sink.
    pub async fn dispatch(&self, alert: &Alert) -> Vec<DispatchResult> {
        if self.sinks.is_empty() {
            tracing::debug!(tag = %alert.tag, "No alert sinks configured");
            return Vec::new();
        }

        let mut results = Vec::with_capacity(self.sinks.len());

        for sink in &self.sinks {
            let start = std::time::Instant::now();
            let result = sink.deliver(alert).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            let (success, error) = match result {
                Ok(()) => {
                    tracing::debug!(
                        tag = %alert.tag,
                        channel = sink.channel_name(),
                        duration_ms,
                        "Alert delivered"
                    );
                    (true, None)
                }
                Err(e) => {
                    tracing::warn!(
                        tag = %alert.tag,
                        channel = sink.channel_name(),
                        error = %e,
                        duration_ms,
                        "Alert delivery failed"
                    );
                    (false, Some(e.to_string()))
                }
            };

            results.push(DispatchResult {
                channel: sink.channel_name().to_string(),
                tag: alert.tag.clone(),
                success,
                error,
                duration_ms,
            });
        }

        results
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NotifyError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct MockSink {
        name: String,
        send_count: Arc<AtomicUsize>,
        should_fail: bool,
    }

    #[async_trait::async_trait]
    impl AlertSink for MockSink {
        async fn deliver(&self, _alert: &Alert) -> Result<(), NotifyError> {
            self.send_count.fetch_add(1, Ordering::SeqCst);
            if self.should_fail {
                Err(NotifyError::Unavailable("mock failure".to_string()))
            } else {
                Ok(())
            }
        }

        fn channel_name(&self) -> &str {
            &self.name
        }
    }

    fn sink(name: &str, count: &Arc<AtomicUsize>, should_fail: bool) -> Box<dyn AlertSink> {
        Box::new(MockSink {
            name: name.to_string(),
            send_count: count.clone(),
            should_fail,
        })
    }

    #[tokio::test]
    async fn dispatch_to_all_sinks() {
        let count_a = Arc::new(AtomicUsize::new(0));
        let count_b = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(vec![
            sink("a", &count_a, false),
            sink("b", &count_b, false),
        ]);

        let results = dispatcher.dispatch(&Alert::new("Rent", "", "1")).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.success && r.tag == "1"));
        assert_eq!(count_a.load(Ordering::SeqCst), 1);
        assert_eq!(count_b.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn partial_failure_doesnt_block() {
        let failed = Arc::new(AtomicUsize::new(0));
        let ok = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::empty();
        dispatcher.add_sink(sink("fail", &failed, true));
        dispatcher.add_sink(sink("ok", &ok, false));

        let results = dispatcher.dispatch(&Alert::new("Rent", "", "1")).await;
        assert_eq!(results.len(), 2);
        assert!(!results[0].success);
        assert!(results[0].error.as_deref().unwrap().contains("mock failure"));
        assert!(results[1].success);
        assert_eq!(ok.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_dispatcher_returns_no_results() {
        let dispatcher = Dispatcher::default();
        assert!(dispatcher.is_empty());
        let results = dispatcher.dispatch(&Alert::new("x", "", "1")).await;
        assert!(results.is_empty());
    }
}
