use crate::actors::traits::SummarySink;
use crate::error::AppError;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

/// One published output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    SummaryText(String),
    StructuredBuckets(String),
}

/// Forwards published outputs over an unbounded channel.
///
/// Lets an embedding host consume summaries as events instead of implementing
/// [`SummarySink`] itself.
#[derive(Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<SinkEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SinkEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn forward(&self, event: SinkEvent) -> Result<(), AppError> {
        self.sender
            .send(event)
            .map_err(|_| AppError::Sink("Event receiver dropped".to_string()))
    }
}

#[async_trait]
impl SummarySink for ChannelSink {
    async fn publish_summary_text(&self, text: String) -> Result<(), AppError> {
        self.forward(SinkEvent::SummaryText(text))
    }

    async fn publish_structured_buckets(&self, payload: String) -> Result<(), AppError> {
        self.forward(SinkEvent::StructuredBuckets(payload))
    }
}

/// Writes published outputs to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[async_trait]
impl SummarySink for TracingSink {
    async fn publish_summary_text(&self, text: String) -> Result<(), AppError> {
        info!(%text, "summary published");
        Ok(())
    }

    async fn publish_structured_buckets(&self, payload: String) -> Result<(), AppError> {
        info!(%payload, "structured buckets published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_forwards_in_order() {
        let (sink, mut rx) = ChannelSink::new();
        sink.publish_summary_text("text".into()).await.unwrap();
        sink.publish_structured_buckets("payload".into()).await.unwrap();
        assert_eq!(rx.recv().await, Some(SinkEvent::SummaryText("text".into())));
        assert_eq!(
            rx.recv().await,
            Some(SinkEvent::StructuredBuckets("payload".into()))
        );
    }

    #[tokio::test]
    async fn test_channel_sink_fails_when_receiver_dropped() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        let result = sink.publish_summary_text("text".into()).await;
        assert!(matches!(result, Err(AppError::Sink(_))));
    }

    #[tokio::test]
    async fn test_tracing_sink_never_fails() {
        let sink = TracingSink;
        assert!(sink.publish_summary_text("t".into()).await.is_ok());
        assert!(sink.publish_structured_buckets("p".into()).await.is_ok());
    }
}
