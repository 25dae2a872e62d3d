use thiserror::Error;

/// Failures that end a slash-command request early.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Only POST requests are accepted")]
    MethodNotAllowed,
    #[error("Invalid credentials")]
    Unauthorized,
    #[error("failed to encode reply: {0}")]
    Encode(#[from] serde_json::Error),
}

impl WebhookError {
    pub fn status(&self) -> u16 {
        match self {
            Self::MethodNotAllowed => 405,
            Self::Unauthorized => 401,
            Self::Encode(_) => 500,
        }
    }

    /// Text safe to show in Slack. Internal details stay in the logs.
    pub fn reply_text(&self) -> String {
        match self {
            Self::MethodNotAllowed | Self::Unauthorized => self.to_string(),
            Self::Encode(_) => "Something went wrong while looking that up. Try again".to_string(),
        }
    }
}

/// Why a directory lookup came back empty. Never leaves the directory client.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("users.info returned HTTP {0}")]
    Status(u16),
    #[error("users.info returned an error: {0}")]
    Api(String),
    #[error("users.info response had no user")]
    MissingUser,
}
