//! Digest Tests
//!
//! End-to-end checks of rule compilation, classification and rendering for one window.

use crate::digest::renderer::ELLIPSIS;
use crate::digest::{RuleSet, SummaryRenderer};
use crate::models::{ChatMessage, InboundMessage};
use crate::settings::{Settings, SettingsInput};

fn msg(user: &str, text: &str) -> ChatMessage {
    InboundMessage::new(user, text, "twitch", user)
        .accept()
        .expect("test message must be valid")
}

fn render(settings: &Settings, messages: &[ChatMessage]) -> crate::models::SummaryResult {
    let rules = RuleSet::compile(&settings.categories, &settings.category_overrides);
    SummaryRenderer::new(settings).render(messages, &rules)
}

#[cfg(test)]
mod classification_tests {
    use super::*;

    #[test]
    fn test_message_in_two_buckets_user_in_one_line() {
        let settings = Settings::default();
        let messages = vec![msg("Alice", "quick feedback: this stream is hype")];
        let result = render(&settings, &messages);

        let feedback = &result.buckets[0];
        let hype = &result.buckets[2];
        assert_eq!(feedback.category, "feedback");
        assert_eq!(hype.category, "hype");
        assert_eq!(feedback.messages.len(), 1);
        assert_eq!(hype.messages.len(), 1);

        assert_eq!(result.category_lines, vec!["Feedback: Alice"]);
    }

    #[test]
    fn test_unknown_category_produces_nothing() {
        let settings = Settings::from_input(SettingsInput {
            categories: Some(vec!["memes".to_string(), "hype".to_string()]),
            ..Default::default()
        });
        let result = render(&settings, &[msg("a", "gg wp"), msg("b", "lol")]);
        assert_eq!(result.buckets.len(), 1);
        assert_eq!(result.category_lines, vec!["Hype: a", "Other: b"]);
    }

    #[test]
    fn test_override_replaces_builtin_keywords() {
        let settings = Settings::from_input(SettingsInput {
            categories: Some(vec!["hype".to_string()]),
            category_overrides: Some("hype: banger\nbogus line".to_string()),
            ..Default::default()
        });
        let result = render(&settings, &[msg("a", "gg"), msg("b", "what a BANGER")]);
        assert_eq!(result.category_lines, vec!["Hype: b", "Other: a"]);
        assert_eq!(result.other_bucket.len(), 1);
    }
}

#[cfg(test)]
mod ranking_tests {
    use super::*;

    #[test]
    fn test_top_chatters_ties_by_first_seen() {
        let settings = Settings::default();
        let messages: Vec<ChatMessage> = ["A", "B", "A", "B", "A", "B", "C"]
            .iter()
            .map(|user| msg(user, "hello"))
            .collect();
        let result = render(&settings, &messages);
        assert_eq!(result.top_chatters_label, "A(3), B(3), C(1)");
        assert_eq!(result.total_messages, 7);
        assert_eq!(result.unique_users, 3);
    }

    #[test]
    fn test_category_line_overflow_count() {
        let settings = Settings::from_input(SettingsInput {
            max_users_per_category: Some(2),
            ..Default::default()
        });
        let messages: Vec<ChatMessage> = ["u1", "u2", "u3", "u4", "u5"]
            .iter()
            .map(|user| msg(user, "pog"))
            .collect();
        let result = render(&settings, &messages);
        assert_eq!(result.category_lines, vec!["Hype: u1, u2 (+3)"]);
    }
}

#[cfg(test)]
mod rendering_tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let settings = Settings::default();
        let result = render(&settings, &[msg("Alice", "why is it lagging?"), msg("Bob", "hi")]);
        assert_eq!(
            result.rendered_text,
            "Chat summary (last 5 min): 2 messages from 2 users\n\
             Top chatters: Alice(1), Bob(1)\n\
             Categories: Questions: Alice | Other: Bob"
        );
    }

    #[test]
    fn test_template_with_unknown_placeholder() {
        let settings = Settings::from_input(SettingsInput {
            interval_minutes: Some(10),
            summary_template: Some(
                "[{interval}m] {totalMessages}/{uniqueUsers} {topChatters} :: {categories} {mood}"
                    .to_string(),
            ),
            ..Default::default()
        });
        let result = render(&settings, &[msg("Alice", "gg"), msg("Alice", "omg")]);
        assert_eq!(result.rendered_text, "[10m] 2/1 Alice(2) :: Hype: Alice {mood}");
    }

    #[test]
    fn test_rendered_text_truncated_with_ellipsis() {
        let settings = Settings::from_input(SettingsInput {
            max_summary_length: Some(100),
            ..Default::default()
        });
        let messages: Vec<ChatMessage> = (0..40)
            .map(|i| msg(&format!("viewer_number_{}", i), "hello"))
            .collect();
        let result = render(&settings, &messages);
        assert_eq!(result.rendered_text.chars().count(), 100);
        assert!(result.rendered_text.ends_with(ELLIPSIS));
    }
}

#[cfg(test)]
mod structured_tests {
    use super::*;

    #[test]
    fn test_structured_shape() {
        let settings = Settings::from_input(SettingsInput {
            interval_minutes: Some(5),
            category_overrides: Some("feedback: cool".to_string()),
            ..Default::default()
        });
        let mut messages = vec![msg("user1", "he said \"cool\"")];
        for i in 0..7 {
            messages.push(msg(&format!("lurker{}", i), "hello"));
        }
        let result = render(&settings, &messages);

        assert!(result
            .structured
            .starts_with("5min ago, totalMessages: 8, topChatters: "));
        assert!(result
            .structured
            .contains("Feedback: (user1:\"he said 'cool'\")"));
        assert!(result.structured.contains("Other: (lurker0:\"hello\")"));
        assert!(!result.structured.contains("Questions:"));
        assert!(!result.structured.contains("Hype:"));
    }

    #[test]
    fn test_structured_omits_other_when_empty() {
        let settings = Settings::default();
        let result = render(&settings, &[msg("a", "gg"), msg("b", "why?")]);
        assert_eq!(
            result.structured,
            "5min ago, totalMessages: 2, topChatters: a(1), b(1), \
             Questions: (b:\"why?\"), Hype: (a:\"gg\")"
        );
    }
}
