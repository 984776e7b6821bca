//! Engine configuration.
//!
//! Hosts hand over a loosely-typed [`SettingsInput`] snapshot (every field optional);
//! [`Settings::from_input`] applies defaults and clamps once, at the boundary, so
//! the rest of the engine only ever sees valid values.

use crate::error::AppError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_INTERVAL_MINUTES: i64 = 5;
pub const DEFAULT_MIN_MESSAGES: i64 = 5;
pub const DEFAULT_MAX_BUFFERED_MESSAGES: i64 = 1000;
pub const DEFAULT_MAX_USERS_PER_CATEGORY: i64 = 10;
pub const DEFAULT_MAX_SUMMARY_LENGTH: i64 = 350;
pub const DEFAULT_CATEGORIES: &[&str] = &["feedback", "questions", "hype"];

/// Prefix of the `CHATDIGEST_*` environment variables.
const ENV_PREFIX: &str = "CHATDIGEST";
/// Separates list items (category names, override lines) inside one variable.
const ENV_LIST_SEPARATOR: &str = ";";

/// A configuration snapshot as delivered by the host, before defaults and clamping.
///
/// Every field is parsed on its own: a value of the wrong shape leaves that field
/// unset instead of rejecting the snapshot. Numbers may arrive as integers, integral
/// floats or numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsInput {
    #[serde(
        alias = "interval_minutes",
        alias = "intervalminutes",
        deserialize_with = "lenient_number"
    )]
    pub interval_minutes: Option<i64>,
    #[serde(
        alias = "min_messages",
        alias = "minmessages",
        deserialize_with = "lenient_number"
    )]
    pub min_messages: Option<i64>,
    #[serde(
        alias = "max_buffered_messages",
        alias = "maxbufferedmessages",
        deserialize_with = "lenient_number"
    )]
    pub max_buffered_messages: Option<i64>,
    #[serde(deserialize_with = "lenient_list")]
    pub categories: Option<Vec<String>>,
    #[serde(
        alias = "category_overrides",
        alias = "categoryoverrides",
        deserialize_with = "lenient_lines"
    )]
    pub category_overrides: Option<String>,
    #[serde(
        alias = "max_users_per_category",
        alias = "maxuserspercategory",
        deserialize_with = "lenient_number"
    )]
    pub max_users_per_category: Option<i64>,
    #[serde(
        alias = "max_summary_length",
        alias = "maxsummarylength",
        deserialize_with = "lenient_number"
    )]
    pub max_summary_length: Option<i64>,
    #[serde(
        alias = "summary_template",
        alias = "summarytemplate",
        deserialize_with = "lenient_text"
    )]
    pub summary_template: Option<String>,
}

impl SettingsInput {
    /// Parses a host snapshot. Only input that is not a JSON object is an error.
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads `CHATDIGEST_*` environment variables.
    ///
    /// Category names and override lines are separated by `;`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_sources(None)
    }

    /// Layers the optional JSON file under the `CHATDIGEST_*` environment variables.
    pub fn from_sources(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Json)
                    .required(true),
            );
        }

        let env_config = config::Environment::with_prefix(ENV_PREFIX)
            .list_separator(ENV_LIST_SEPARATOR)
            .with_list_parse_key("categories")
            .with_list_parse_key("category_overrides")
            .try_parsing(true);

        Ok(builder
            .add_source(env_config)
            .build()?
            .try_deserialize::<SettingsInput>()?)
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_integer(&Value::deserialize(deserializer)?))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_text(&Value::deserialize(deserializer)?))
}

/// Accepts one string or a list of strings, joined into lines.
fn lenient_lines<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(as_text)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        other => as_text(other),
    })
}

/// Accepts a list of names or a comma-separated string; blank names are dropped.
fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items: Vec<String> = match &value {
        Value::Array(items) => items.iter().filter_map(as_text).collect(),
        other => match as_text(other) {
            Some(text) => vec![text],
            None => return Ok(None),
        },
    };
    Ok(Some(
        items
            .iter()
            .flat_map(|item| item.split(','))
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect(),
    ))
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

fn integral(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// The typed, clamped configuration record used by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Window length, in [1, 60].
    pub interval_minutes: u32,
    /// Minimum drained messages for a timer-driven cycle to render, in [1, 1000].
    pub min_messages: usize,
    /// Buffer capacity, in [0, 10000]; 0 means unbounded.
    pub max_buffered_messages: usize,
    /// Selected category keys, trimmed, lowercased and de-duplicated.
    pub categories: Vec<String>,
    /// Raw override block, one `category: kw1,kw2` rule per line.
    pub category_overrides: String,
    /// Visible names per category line, in [1, 50].
    pub max_users_per_category: usize,
    /// Maximum rendered length in characters, in [100, 2000].
    pub max_summary_length: usize,
    /// Template with `{placeholder}` tokens; `None` selects the built-in layout.
    pub summary_template: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_input(SettingsInput::default())
    }
}

impl Settings {
    pub fn from_input(input: SettingsInput) -> Self {
        let categories = input
            .categories
            .unwrap_or_else(|| DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect());

        let mut normalized: Vec<String> = Vec::with_capacity(categories.len());
        for category in categories {
            let key = category.trim().to_lowercase();
            if !key.is_empty() && !normalized.contains(&key) {
                normalized.push(key);
            }
        }

        Self {
            interval_minutes: clamp_or(input.interval_minutes, DEFAULT_INTERVAL_MINUTES, 1, 60) as u32,
            min_messages: clamp_or(input.min_messages, DEFAULT_MIN_MESSAGES, 1, 1000) as usize,
            max_buffered_messages: clamp_or(
                input.max_buffered_messages,
                DEFAULT_MAX_BUFFERED_MESSAGES,
                0,
                10_000,
            ) as usize,
            categories: normalized,
            category_overrides: input.category_overrides.unwrap_or_default(),
            max_users_per_category: clamp_or(
                input.max_users_per_category,
                DEFAULT_MAX_USERS_PER_CATEGORY,
                1,
                50,
            ) as usize,
            max_summary_length: clamp_or(
                input.max_summary_length,
                DEFAULT_MAX_SUMMARY_LENGTH,
                100,
                2000,
            ) as usize,
            summary_template: input
                .summary_template
                .filter(|template| !template.trim().is_empty()),
        }
    }

    /// Loads defaults, then the optional JSON file, then `CHATDIGEST_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let input = SettingsInput::from_sources(path).map_err(|e| match path {
            Some(path) => {
                AppError::Config(format!("Cannot load settings from {}: {}", path.display(), e))
            }
            None => e,
        })?;
        Ok(Self::from_input(input))
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_minutes) * 60)
    }
}

fn clamp_or(value: Option<i64>, default: i64, min: i64, max: i64) -> i64 {
    value.unwrap_or(default).clamp(min, max)
}
