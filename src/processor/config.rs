use std::time::Duration;

use crate::config_util::{self, ConfigError, DEFAULT_PROFILE_EDIT_URL};

const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub api_token: String,
    pub api_base: String,
    pub http_timeout: Duration,
    pub dry_run: bool,
    pub profile_edit_url: String,
    /// Sender identity shown on nudges.
    pub username: String,
    pub icon_emoji: String,
}

impl NotifierConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let dry_run = var("DRY_RUN").map(|v| config_util::flag(&v)).unwrap_or(false);

        // A dry run never talks to Slack, so it can do without a token.
        let api_token = match var("SLACK_API_TOKEN") {
            Some(token) => token,
            None if dry_run => String::new(),
            None => return Err(ConfigError::Missing("SLACK_API_TOKEN")),
        };

        Ok(Self {
            api_token,
            api_base: config_util::api_base(var("SLACK_API_BASE")),
            http_timeout: config_util::millis(
                "SLACK_HTTP_TIMEOUT_MS",
                var("SLACK_HTTP_TIMEOUT_MS"),
                DEFAULT_HTTP_TIMEOUT_MS,
            )?,
            dry_run,
            profile_edit_url: var("PROFILE_EDIT_URL")
                .unwrap_or_else(|| DEFAULT_PROFILE_EDIT_URL.to_string()),
            username: var("BOT_USERNAME").unwrap_or_else(|| "Whois".to_string()),
            icon_emoji: var("BOT_ICON_EMOJI").unwrap_or_else(|| ":mag:".to_string()),
        })
    }
}
