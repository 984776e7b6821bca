//! Category rules.
//!
//! Compiles the selected category names and the optional override block into an
//! ordered [`RuleSet`]. Never fails: malformed lines and unknown categories are dropped.

use serde::Serialize;
use std::collections::HashMap;

/// Keyword that matches any text containing a question mark.
pub const QUESTION_SENTINEL: &str = "?";

const FEEDBACK_KEYWORDS: &[&str] = &[
    "feedback",
    "suggest",
    "suggestion",
    "bug",
    "issue",
    "broken",
    "improve",
    "should add",
    "would be nice",
    "please add",
];

const QUESTION_KEYWORDS: &[&str] = &[
    QUESTION_SENTINEL,
    "how do",
    "how to",
    "what is",
    "why",
    "anyone know",
    "can someone",
];

const HYPE_KEYWORDS: &[&str] = &[
    "hype", "pog", "lets go", "let's go", "gg", "omg", "wow", "insane", "amazing", "fire",
];

/// Built-in keyword list for a category key, if one exists.
pub fn default_keywords(category: &str) -> Option<&'static [&'static str]> {
    match category {
        "feedback" => Some(FEEDBACK_KEYWORDS),
        "questions" => Some(QUESTION_KEYWORDS),
        "hype" => Some(HYPE_KEYWORDS),
        _ => None,
    }
}

/// Display label for a category key: first character uppercased.
pub fn category_label(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A named category and its case-normalized keywords, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    fn new<I, S>(name: &str, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }
        Self {
            name: name.to_string(),
            keywords: normalized,
        }
    }

    pub fn label(&self) -> String {
        category_label(&self.name)
    }

    /// Whether any keyword matches `text`. `text` must already be lowercased.
    pub fn matches(&self, text: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| keyword_matches(keyword, text))
    }
}

fn keyword_matches(keyword: &str, text: &str) -> bool {
    if keyword == QUESTION_SENTINEL {
        text.contains('?')
    } else {
        text.contains(keyword)
    }
}

/// Ordered mapping from category name to rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    rules: Vec<CategoryRule>,
}

impl RuleSet {
    /// Builds the rule set for `categories`, preferring overrides over built-in lists.
    ///
    /// Categories with neither an override nor a built-in list are dropped.
    pub fn compile<S: AsRef<str>>(categories: &[S], overrides: &str) -> Self {
        let overrides = parse_overrides(overrides);
        let mut rules: Vec<CategoryRule> = Vec::new();

        for category in categories {
            let key = category.as_ref().trim().to_lowercase();
            if key.is_empty() || rules.iter().any(|rule| rule.name == key) {
                continue;
            }
            if let Some(keywords) = overrides.get(&key) {
                rules.push(CategoryRule::new(&key, keywords));
            } else if let Some(keywords) = default_keywords(&key) {
                rules.push(CategoryRule::new(&key, keywords.iter()));
            }
        }

        Self { rules }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules.iter()
    }

    pub fn get(&self, category: &str) -> Option<&CategoryRule> {
        self.rules.iter().find(|rule| rule.name == category)
    }

    pub fn names(&self) -> Vec<String> {
        self.rules.iter().map(|rule| rule.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Parses `category: kw1,kw2` lines. Later lines for the same category win.
fn parse_overrides(block: &str) -> HashMap<String, Vec<String>> {
    let mut overrides = HashMap::new();
    for line in block.lines() {
        let Some((name, keywords)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim().to_lowercase();
        let keywords: Vec<String> = keywords
            .split(',')
            .map(|kw| kw.trim().to_lowercase())
            .filter(|kw| !kw.is_empty())
            .collect();
        if name.is_empty() || keywords.is_empty() {
            continue;
        }
        overrides.insert(name, keywords);
    }
    overrides
}
