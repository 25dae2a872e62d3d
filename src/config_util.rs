//! Environment parsing shared by both lambdas.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://slack.com/api";
pub const DEFAULT_PROFILE_EDIT_URL: &str = "https://slack.com/account/profile";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Anything but `0`, `false`, `no` or `off` counts as set.
pub fn flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

pub fn millis(
    key: &'static str,
    raw: Option<String>,
    default_ms: u64,
) -> Result<Duration, ConfigError> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(Duration::from_millis(default_ms)),
    }
}

pub fn api_base(raw: Option<String>) -> String {
    raw.map(|base| base.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_is_false_only_for_explicit_negatives() {
        for value in ["1", "true", "yes", "on", "TRUE"] {
            assert!(flag(value), "{value}");
        }
        for value in ["0", "false", " No ", "OFF"] {
            assert!(!flag(value), "{value}");
        }
    }

    #[test]
    fn millis_falls_back_and_rejects_garbage() {
        assert_eq!(
            millis("T", None, 2_500),
            Ok(Duration::from_millis(2_500))
        );
        assert_eq!(
            millis("T", Some(" 800 ".to_string()), 2_500),
            Ok(Duration::from_millis(800))
        );
        assert_eq!(
            millis("T", Some("soon".to_string()), 2_500),
            Err(ConfigError::Invalid {
                key: "T",
                value: "soon".to_string()
            })
        );
    }

    #[test]
    fn api_base_drops_trailing_slash() {
        assert_eq!(api_base(None), DEFAULT_API_BASE);
        assert_eq!(
            api_base(Some("http://localhost:9999/api/".to_string())),
            "http://localhost:9999/api"
        );
    }
}
