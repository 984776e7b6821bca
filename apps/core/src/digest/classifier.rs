//! Keyword classification of one drained window.
//!
//! Two passes with different policies:
//! - user level: one category per user, first matching rule wins
//! - message level: a message lands in every bucket whose rule matches

use super::rules::RuleSet;
use crate::models::{CategoryBucket, ChatMessage, UserAggregate};
use std::collections::HashMap;

/// Users attributed to one category by the user-level pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryUsers {
    pub category: String,
    /// Display names, in first-seen order.
    pub users: Vec<String>,
}

/// Output of classifying one window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// One aggregate per distinct username, in first-seen order.
    pub users: Vec<UserAggregate>,
    /// One entry per rule, in rule order (possibly with no users).
    pub category_users: Vec<CategoryUsers>,
    /// Users that matched no rule.
    pub other_users: Vec<String>,
    /// One bucket per rule, in rule order (possibly empty).
    pub buckets: Vec<CategoryBucket>,
    /// Messages that matched no rule.
    pub other_bucket: Vec<ChatMessage>,
}

/// Groups messages by lowercased username, keeping first-seen order.
pub fn aggregate_users(messages: &[ChatMessage]) -> Vec<UserAggregate> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut users: Vec<UserAggregate> = Vec::new();

    for message in messages {
        match index.get(message.username.as_str()) {
            Some(&i) => {
                let user = &mut users[i];
                user.message_count += 1;
                user.concatenated_text.push(' ');
                user.concatenated_text.push_str(&message.text);
            }
            None => {
                index.insert(&message.username, users.len());
                users.push(UserAggregate {
                    username: message.username.clone(),
                    display_name: message.display_name.clone(),
                    message_count: 1,
                    concatenated_text: message.text.clone(),
                });
            }
        }
    }

    users
}

pub fn classify(messages: &[ChatMessage], rules: &RuleSet) -> Classification {
    let users = aggregate_users(messages);

    let mut category_users: Vec<CategoryUsers> = rules
        .iter()
        .map(|rule| CategoryUsers {
            category: rule.name.clone(),
            users: Vec::new(),
        })
        .collect();
    let mut other_users = Vec::new();

    for user in &users {
        let text = user.concatenated_text.to_lowercase();
        match rules.iter().position(|rule| rule.matches(&text)) {
            Some(i) => category_users[i].users.push(user.display_name.clone()),
            None => other_users.push(user.display_name.clone()),
        }
    }

    let mut buckets: Vec<CategoryBucket> = rules
        .iter()
        .map(|rule| CategoryBucket {
            category: rule.name.clone(),
            messages: Vec::new(),
        })
        .collect();
    let mut other_bucket = Vec::new();

    for message in messages {
        let text = message.text.to_lowercase();
        let mut matched = false;
        for (rule, bucket) in rules.iter().zip(buckets.iter_mut()) {
            if rule.matches(&text) {
                bucket.messages.push(message.clone());
                matched = true;
            }
        }
        if !matched {
            other_bucket.push(message.clone());
        }
    }

    Classification {
        users,
        category_users,
        other_users,
        buckets,
        other_bucket,
    }
}
