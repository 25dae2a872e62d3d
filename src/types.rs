use serde::{Deserialize, Serialize};

use crate::blocks::Block;

/// Slash-command payload as Slack posts it (form-encoded).
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct SlackCommand {
    pub token: String,
    pub team_id: String,
    pub team_domain: String,
    pub channel_id: String,
    pub channel_name: String,
    pub user_id: String,
    pub user_name: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
    pub trigger_id: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SlackResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
}

impl SlackResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            response_type: None,
            text: Some(text.into()),
            blocks: Vec::new(),
        }
    }

    /// `text` doubles as the notification fallback when blocks are present.
    pub fn blocks(text: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            response_type: None,
            text: Some(text.into()),
            blocks,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            response_type: Some("in_channel".to_string()),
            text: Some(text.into()),
            blocks: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NudgeKind {
    /// The user someone looked up.
    Requestee,
    /// The user who ran the command.
    Requester,
}

/// Queue message handed from the receiver to the processor.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NudgeJob {
    pub recipient_id: String,
    pub recipient_name: String,
    pub kind: NudgeKind,
    pub missing_fields: Vec<String>,
    #[serde(default)]
    pub requested_by: Option<String>,
    pub enqueued_at: String,
}
