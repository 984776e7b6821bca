use crate::error::AppError;
use async_trait::async_trait;

/// Defines the outbound interface of the engine: where rendered summaries go.
///
/// This trait abstracts the host transport, allowing a chat overlay, a variable
/// store, or a test recorder to be used interchangeably. Calls may suspend; the
/// engine never holds the message buffer while publishing.
#[async_trait]
pub trait SummarySink: Send + Sync + 'static {
    /// Shows the rendered summary text.
    async fn publish_summary_text(&self, text: String) -> Result<(), AppError>;

    /// Stores the single-line structured bucket string for downstream consumers.
    async fn publish_structured_buckets(&self, payload: String) -> Result<(), AppError>;
}
