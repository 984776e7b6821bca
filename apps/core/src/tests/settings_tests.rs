//! Settings Tests
//!
//! Loading configuration from JSON snapshots, files and `CHATDIGEST_*` variables.

use crate::error::AppError;
use crate::settings::{Settings, SettingsInput};
use std::io::Write;

#[cfg(test)]
mod snapshot_tests {
    use super::*;

    #[test]
    fn test_host_snapshot_camel_case() {
        let input = SettingsInput::from_json_str(
            r#"{
                "intervalMinutes": 2,
                "minMessages": 0,
                "maxBufferedMessages": 50000,
                "categories": ["Questions", "games"],
                "categoryOverrides": "games: speedrun, pb",
                "maxUsersPerCategory": 3,
                "maxSummaryLength": 500,
                "summaryTemplate": "{totalMessages} msgs"
            }"#,
        )
        .unwrap();
        let settings = Settings::from_input(input);

        assert_eq!(settings.interval_minutes, 2);
        assert_eq!(settings.min_messages, 1);
        assert_eq!(settings.max_buffered_messages, 10_000);
        assert_eq!(settings.categories, vec!["questions", "games"]);
        assert_eq!(settings.category_overrides, "games: speedrun, pb");
        assert_eq!(settings.max_users_per_category, 3);
        assert_eq!(settings.max_summary_length, 500);
        assert_eq!(settings.summary_template.as_deref(), Some("{totalMessages} msgs"));
    }

    #[test]
    fn test_empty_snapshot_uses_defaults() {
        let input = SettingsInput::from_json_str("{}").unwrap();
        assert_eq!(Settings::from_input(input), Settings::default());
    }

    #[test]
    fn test_invalid_json_is_validation_error() {
        let result = SettingsInput::from_json_str(r#"{"intervalMinutes": 3"#);
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = SettingsInput::from_json_str(r#""just a string""#);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_mistyped_field_keeps_the_rest() {
        let input = SettingsInput::from_json_str(
            r#"{"intervalMinutes": "10", "maxSummaryLength": 120.0, "minMessages": 3}"#,
        )
        .unwrap();
        assert_eq!(input.interval_minutes, Some(10));
        assert_eq!(input.max_summary_length, Some(120));
        assert_eq!(input.min_messages, Some(3));

        let input = SettingsInput::from_json_str(
            r#"{"intervalMinutes": "soon", "maxUsersPerCategory": 2.5, "categories": {"a": 1}, "minMessages": 3}"#,
        )
        .unwrap();
        assert_eq!(input.interval_minutes, None);
        assert_eq!(input.max_users_per_category, None);
        assert_eq!(input.categories, None);
        assert_eq!(input.min_messages, Some(3));

        let settings = Settings::from_input(input);
        assert_eq!(settings.interval_minutes, 5);
        assert_eq!(settings.max_users_per_category, 10);
        assert_eq!(settings.categories, vec!["feedback", "questions", "hype"]);
        assert_eq!(settings.min_messages, 3);
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let input =
            SettingsInput::from_json_str(r#"{"summaryTemplate": null, "intervalMinutes": null}"#)
                .unwrap();
        assert_eq!(input, SettingsInput::default());
    }
}

#[cfg(test)]
mod source_tests {
    use super::*;

    #[test]
    fn test_env_overrides() {
        temp_env::with_vars(
            vec![
                ("CHATDIGEST_INTERVAL_MINUTES", Some("15")),
                ("CHATDIGEST_MIN_MESSAGES", Some("not-a-number")),
                ("CHATDIGEST_CATEGORIES", Some("hype, ;feedback")),
                ("CHATDIGEST_CATEGORY_OVERRIDES", Some("hype: w;feedback: idea")),
            ],
            || {
                let input = SettingsInput::from_env().unwrap();
                assert_eq!(input.interval_minutes, Some(15));
                assert_eq!(input.min_messages, None);
                assert_eq!(
                    input.categories,
                    Some(vec!["hype".to_string(), "feedback".to_string()])
                );
                assert_eq!(input.category_overrides.as_deref(), Some("hype: w\nfeedback: idea"));
            },
        );
    }

    #[test]
    fn test_env_numbers_and_single_list_items() {
        temp_env::with_vars(
            vec![
                ("CHATDIGEST_MAX_SUMMARY_LENGTH", Some("120.0")),
                ("CHATDIGEST_CATEGORIES", Some("questions,hype")),
                ("CHATDIGEST_SUMMARY_TEMPLATE", Some("{totalMessages} msgs")),
            ],
            || {
                let input = SettingsInput::from_env().unwrap();
                assert_eq!(input.max_summary_length, Some(120));
                assert_eq!(
                    input.categories,
                    Some(vec!["questions".to_string(), "hype".to_string()])
                );
                assert_eq!(input.summary_template.as_deref(), Some("{totalMessages} msgs"));
            },
        );
    }

    #[test]
    fn test_load_file_then_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"intervalMinutes": 4, "maxSummaryLength": 800, "minMessages": "2"}}"#
        )
        .unwrap();

        temp_env::with_vars(
            vec![
                ("CHATDIGEST_INTERVAL_MINUTES", Some("9")),
                ("CHATDIGEST_MAX_SUMMARY_LENGTH", None),
            ],
            || {
                let settings = Settings::load(Some(file.path())).unwrap();
                assert_eq!(settings.interval_minutes, 9);
                assert_eq!(settings.max_summary_length, 800);
                assert_eq!(settings.min_messages, 2);
            },
        );
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        let result = Settings::load(Some(&missing));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
