//! Summary templates.
//!
//! A template is scanned once into literal and placeholder segments, then evaluated
//! against a fixed placeholder table. Placeholders outside the table are emitted
//! verbatim, braces included.

use regex::Regex;
use std::sync::LazyLock;

// NOTE: expect() is acceptable here, the pattern is a compile-time constant
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z][A-Za-z0-9_]*)\}").expect("Invalid regex: placeholder"));

/// Placeholders understood by [`Template::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Interval,
    TotalMessages,
    UniqueUsers,
    TopChatters,
    Categories,
}

impl Placeholder {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "interval" => Some(Placeholder::Interval),
            "totalMessages" => Some(Placeholder::TotalMessages),
            "uniqueUsers" => Some(Placeholder::UniqueUsers),
            "topChatters" => Some(Placeholder::TopChatters),
            "categories" => Some(Placeholder::Categories),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// Values substituted into a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateValues {
    pub interval: String,
    pub total_messages: String,
    pub unique_users: String,
    pub top_chatters: String,
    pub categories: String,
}

impl TemplateValues {
    fn get(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::Interval => &self.interval,
            Placeholder::TotalMessages => &self.total_messages,
            Placeholder::UniqueUsers => &self.unique_users,
            Placeholder::TopChatters => &self.top_chatters,
            Placeholder::Categories => &self.categories,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for captures in PLACEHOLDER.captures_iter(source) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            literal.push_str(&source[last..whole.start()]);
            match Placeholder::from_name(name.as_str()) {
                Some(placeholder) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(placeholder));
                }
                None => literal.push_str(whole.as_str()),
            }
            last = whole.end();
        }

        literal.push_str(&source[last..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn render(&self, values: &TemplateValues) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Placeholder(placeholder) => values.get(*placeholder),
            })
            .collect()
    }
}
