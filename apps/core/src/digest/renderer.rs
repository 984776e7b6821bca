//! Summary rendering.
//!
//! Turns a drained window into the display text and the single-line structured
//! bucket string.

use super::classifier::{classify, Classification};
use super::rules::{category_label, RuleSet};
use super::template::{Template, TemplateValues};
use crate::models::{CategoryBucket, ChatMessage, SummaryResult, UserAggregate};
use crate::settings::Settings;

/// Number of users listed in the top chatters label.
pub const TOP_CHATTERS: usize = 5;
/// Appended in place of the last character when the text is truncated.
pub const ELLIPSIS: char = '…';
pub const OTHER_LABEL: &str = "Other";
const CATEGORY_SEPARATOR: &str = " | ";

#[derive(Debug, Clone)]
pub struct SummaryRenderer {
    interval_minutes: u32,
    max_users_per_category: usize,
    max_summary_length: usize,
    template: Option<Template>,
}

impl SummaryRenderer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            interval_minutes: settings.interval_minutes,
            max_users_per_category: settings.max_users_per_category,
            max_summary_length: settings.max_summary_length,
            template: settings.summary_template.as_deref().map(Template::parse),
        }
    }

    /// Classifies `messages` against `rules` and renders the cycle result.
    pub fn render(&self, messages: &[ChatMessage], rules: &RuleSet) -> SummaryResult {
        let classification = classify(messages, rules);
        self.render_classified(messages.len(), classification)
    }

    pub fn render_classified(
        &self,
        total_messages: usize,
        classification: Classification,
    ) -> SummaryResult {
        let Classification {
            users,
            category_users,
            other_users,
            buckets,
            other_bucket,
        } = classification;

        let unique_users = users.len();
        let top_chatters = top_chatters_label(&users, TOP_CHATTERS);

        let mut category_lines: Vec<String> = category_users
            .iter()
            .filter_map(|entry| {
                category_line(
                    &category_label(&entry.category),
                    &entry.users,
                    self.max_users_per_category,
                )
            })
            .collect();
        if let Some(line) = category_line(OTHER_LABEL, &other_users, self.max_users_per_category) {
            category_lines.push(line);
        }

        let values = TemplateValues {
            interval: self.interval_minutes.to_string(),
            total_messages: total_messages.to_string(),
            unique_users: unique_users.to_string(),
            top_chatters: top_chatters.clone(),
            categories: category_lines.join(CATEGORY_SEPARATOR),
        };

        let text = match &self.template {
            Some(template) => template.render(&values),
            None => default_layout(&values),
        };

        let structured = structured_payload(
            self.interval_minutes,
            total_messages,
            &top_chatters,
            &buckets,
            &other_bucket,
        );

        SummaryResult {
            rendered_text: truncate(&text, self.max_summary_length),
            interval_minutes: self.interval_minutes,
            total_messages,
            unique_users,
            top_chatters_label: top_chatters,
            category_lines,
            buckets,
            other_bucket,
            structured,
        }
    }
}

fn default_layout(values: &TemplateValues) -> String {
    let categories = if values.categories.is_empty() {
        "none"
    } else {
        values.categories.as_str()
    };
    [
        format!(
            "Chat summary (last {} min): {} messages from {} users",
            values.interval, values.total_messages, values.unique_users
        ),
        format!("Top chatters: {}", values.top_chatters),
        format!("Categories: {}", categories),
    ]
    .join("\n")
}

/// Formats the `limit` most active users as `Name(count)`, comma-joined.
///
/// Ties keep first-seen order.
pub fn top_chatters_label(users: &[UserAggregate], limit: usize) -> String {
    let mut ranked: Vec<&UserAggregate> = users.iter().collect();
    ranked.sort_by(|a, b| b.message_count.cmp(&a.message_count));
    ranked
        .into_iter()
        .take(limit)
        .map(|user| format!("{}({})", user.display_name, user.message_count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds `Label: a, b (+K)`, or `None` when there are no users.
pub fn category_line(label: &str, users: &[String], max_users: usize) -> Option<String> {
    if users.is_empty() {
        return None;
    }
    let visible = users.len().min(max_users);
    let mut line = format!("{}: {}", label, users[..visible].join(", "));
    let overflow = users.len() - visible;
    if overflow > 0 {
        line.push_str(&format!(" (+{})", overflow));
    }
    Some(line)
}

/// Cuts `text` to `max_chars` characters, the last one replaced by [`ELLIPSIS`].
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut truncated: String = text.chars().take(max_chars - 1).collect();
    truncated.push(ELLIPSIS);
    truncated
}

/// Serializes the buckets as one line, for downstream consumers such as AI prompts.
///
/// Empty buckets are omitted. Each entry is `(Name:"text")`: the text is wrapped in
/// double quotes and any double quote inside it becomes a single quote.
pub fn structured_payload(
    interval_minutes: u32,
    total_messages: usize,
    top_chatters: &str,
    buckets: &[CategoryBucket],
    other_bucket: &[ChatMessage],
) -> String {
    let mut segments = vec![
        format!("{}min ago", interval_minutes),
        format!("totalMessages: {}", total_messages),
        format!("topChatters: {}", top_chatters),
    ];
    for bucket in buckets.iter().filter(|b| !b.messages.is_empty()) {
        segments.push(bucket_segment(&category_label(&bucket.category), &bucket.messages));
    }
    if !other_bucket.is_empty() {
        segments.push(bucket_segment(OTHER_LABEL, other_bucket));
    }
    segments.join(", ")
}

fn bucket_segment(label: &str, messages: &[ChatMessage]) -> String {
    let entries: Vec<String> = messages
        .iter()
        .map(|m| format!("({}:\"{}\")", m.display_name, m.text.replace('"', "'")))
        .collect();
    format!("{}: {}", label, entries.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, count: usize) -> UserAggregate {
        UserAggregate {
            username: name.to_lowercase(),
            display_name: name.to_string(),
            message_count: count,
            concatenated_text: String::new(),
        }
    }

    #[test]
    fn test_top_chatters_stable_on_ties() {
        let users = vec![user("A", 3), user("B", 3), user("C", 1)];
        assert_eq!(top_chatters_label(&users, 5), "A(3), B(3), C(1)");
    }

    #[test]
    fn test_top_chatters_limited() {
        let users: Vec<UserAggregate> = (1..=7).map(|i| user(&format!("u{}", i), i)).collect();
        assert_eq!(
            top_chatters_label(&users, TOP_CHATTERS),
            "u7(7), u6(6), u5(5), u4(4), u3(3)"
        );
    }

    #[test]
    fn test_category_line_overflow() {
        let users: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(category_line("Hype", &users, 2).unwrap(), "Hype: a, b (+2)");
        assert_eq!(category_line("Hype", &users, 10).unwrap(), "Hype: a, b, c, d");
        assert!(category_line("Hype", &[], 10).is_none());
    }

    #[test]
    fn test_truncate() {
        let text = "abcdefghijklmnopqrstuvwxyz0123";
        assert_eq!(text.chars().count(), 30);
        let cut = truncate(text, 20);
        assert_eq!(cut.chars().count(), 20);
        assert!(cut.ends_with(ELLIPSIS));
        assert_eq!(cut, "abcdefghijklmnopqrs…");
        assert_eq!(truncate("short", 20), "short");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "ééééé";
        assert_eq!(truncate(text, 5), text);
        assert_eq!(truncate(text, 3), "éé…");
    }
}
