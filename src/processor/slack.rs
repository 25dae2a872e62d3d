use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blocks::Block;

#[derive(Debug, Error)]
pub enum SlackError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("chat.postMessage returned HTTP {0}")]
    Status(u16),
    #[error("chat.postMessage returned an error: {0}")]
    Api(String),
}

/// `chat.postMessage` body. A user id as `channel` opens a DM with the app.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PostMessage {
    pub channel: String,
    pub username: String,
    pub icon_emoji: String,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

pub struct SlackMessenger {
    client: Client,
    api_base: String,
    api_token: String,
    dry_run: bool,
}

impl SlackMessenger {
    pub fn new(
        client: Client,
        api_base: impl Into<String>,
        api_token: impl Into<String>,
        dry_run: bool,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            api_token: api_token.into(),
            dry_run,
        }
    }

    pub async fn post_message(&self, message: &PostMessage) -> Result<(), SlackError> {
        if self.dry_run {
            tracing::info!(
                channel = %message.channel,
                text = %message.text,
                "Dry run: message not posted"
            );
            return Ok(());
        }

        let response = self
            .client
            .post(format!("{}/chat.postMessage", self.api_base))
            .bearer_auth(&self.api_token)
            .json(message)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SlackError::Status(response.status().as_u16()));
        }

        // Slack reports most failures as 200 with `ok: false`.
        let body: ApiResponse = response.json().await?;
        if !body.ok {
            return Err(SlackError::Api(
                body.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }

        Ok(())
    }
}
