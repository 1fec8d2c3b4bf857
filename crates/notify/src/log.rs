//! Sink that writes alerts to the tracing output.

use crate::traits::{Alert, AlertSink, NotifyError};

/// Emits every alert as an `info` event. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait::async_trait]
impl AlertSink for LogSink {
    async fn deliver(&self, alert: &Alert) -> Result<(), NotifyError> {
        tracing::info!(
            tag = %alert.tag,
            title = %alert.title,
            body = %alert.body,
            "reminder"
        );
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_sink_always_succeeds() {
        let alert = Alert::new("Rent", "", "4");
        assert!(LogSink.deliver(&alert).await.is_ok());
        assert_eq!(LogSink.channel_name(), "log");
    }
}
