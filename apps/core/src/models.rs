use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A raw chat event as delivered by the host, before it is accepted into the buffer.
///
/// Username and text are trimmed on construction so the length checks reject
/// whitespace-only input.
#[derive(Debug, Clone, Validate)]
pub struct InboundMessage {
    /// The sender's name as shown in chat.
    #[validate(length(min = 1))]
    pub username: String,
    /// The message body.
    #[validate(length(min = 1))]
    pub text: String,
    /// The originating platform (e.g., "twitch", "youtube").
    pub platform: String,
    /// The platform-specific user identifier.
    pub user_id: String,
}

impl InboundMessage {
    pub fn new(
        username: impl AsRef<str>,
        text: impl AsRef<str>,
        platform: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            username: username.as_ref().trim().to_string(),
            text: text.as_ref().trim().to_string(),
            platform: platform.into(),
            user_id: user_id.into(),
        }
    }

    /// Converts into a buffered [`ChatMessage`] stamped with the current time.
    ///
    /// Returns `None` when the username or text is empty.
    pub fn accept(self) -> Option<ChatMessage> {
        if self.validate().is_err() {
            return None;
        }
        Some(ChatMessage {
            username: self.username.to_lowercase(),
            display_name: self.username,
            text: self.text,
            platform: self.platform,
            user_id: self.user_id,
            timestamp_ms: Utc::now().timestamp_millis(),
        })
    }
}

/// A single buffered chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Lowercased username, used as the aggregation key.
    pub username: String,
    /// The username as it was received.
    pub display_name: String,
    pub text: String,
    pub platform: String,
    pub user_id: String,
    /// Unix timestamp in milliseconds of when the message was accepted.
    pub timestamp_ms: i64,
}

/// Per-cycle aggregate of everything one user said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAggregate {
    /// Lowercased username.
    pub username: String,
    /// Display name of the user's first message in the cycle.
    pub display_name: String,
    pub message_count: usize,
    /// All of the user's message texts, joined with a single space.
    pub concatenated_text: String,
}

/// Every message of one cycle that matched a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBucket {
    pub category: String,
    pub messages: Vec<ChatMessage>,
}

/// The outcome of one summarization cycle.
///
/// Produced once per cycle, published, then dropped; the engine keeps no history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    /// The final display text, already truncated.
    pub rendered_text: String,
    pub interval_minutes: u32,
    pub total_messages: usize,
    pub unique_users: usize,
    /// Top chatters formatted as `Name(count)`, comma-joined.
    pub top_chatters_label: String,
    pub category_lines: Vec<String>,
    /// Category buckets in rule order.
    pub buckets: Vec<CategoryBucket>,
    /// Messages that matched no category.
    pub other_bucket: Vec<ChatMessage>,
    /// The single-line structured representation published alongside the text.
    pub structured: String,
}
