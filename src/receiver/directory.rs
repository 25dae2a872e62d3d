use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

use crate::error::DirectoryError;

/// Profile record as this service sees it. Always fetched fresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    pub real_name: String,
    pub first_name: String,
    pub title: String,
    pub avatar_url: Option<String>,
    /// Custom field id → value.
    pub fields: HashMap<String, String>,
}

impl UserProfile {
    /// Value of a custom field, or `None` when unset or blank.
    pub fn field(&self, id: &str) -> Option<&str> {
        self.fields
            .get(id)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn name(&self) -> &str {
        [&self.display_name, &self.real_name, &self.first_name]
            .into_iter()
            .map(|name| name.trim())
            .find(|name| !name.is_empty())
            .unwrap_or(self.id.as_str())
    }
}

#[async_trait]
pub trait Directory: Send + Sync {
    /// `None` covers "no such user" and "could not ask".
    async fn fetch_user_profile(&self, user_id: &str) -> Option<UserProfile>;
}

pub struct SlackDirectory {
    client: Client,
    api_base: String,
    api_token: String,
}

impl SlackDirectory {
    pub fn new(client: Client, api_base: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            api_token: api_token.into(),
        }
    }

    async fn users_info(&self, user_id: &str) -> Result<UserProfile, DirectoryError> {
        let response = self
            .client
            .get(format!("{}/users.info", self.api_base))
            .bearer_auth(&self.api_token)
            .query(&[("user", user_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DirectoryError::Status(response.status().as_u16()));
        }

        let info: UsersInfoResponse = response.json().await?;
        if !info.ok {
            return Err(DirectoryError::Api(
                info.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }

        info.user
            .map(UserProfile::from)
            .ok_or(DirectoryError::MissingUser)
    }
}

#[async_trait]
impl Directory for SlackDirectory {
    async fn fetch_user_profile(&self, user_id: &str) -> Option<UserProfile> {
        match self.users_info(user_id).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Profile lookup failed");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct UsersInfoResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    user: Option<SlackUser>,
}

#[derive(Debug, Deserialize)]
struct SlackUser {
    id: String,
    #[serde(default)]
    real_name: Option<String>,
    #[serde(default)]
    profile: SlackProfile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SlackProfile {
    display_name: String,
    real_name: String,
    first_name: String,
    title: String,
    image_192: Option<String>,
    image_72: Option<String>,
    #[serde(deserialize_with = "custom_fields")]
    fields: HashMap<String, SlackField>,
}

#[derive(Debug, Deserialize)]
struct SlackField {
    #[serde(default)]
    value: Option<String>,
}

/// Slack sends `null` or `[]` instead of `{}` when a user has no custom fields.
fn custom_fields<'de, D>(deserializer: D) -> Result<HashMap<String, SlackField>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::Object(map)) = raw else {
        return Ok(HashMap::new());
    };

    Ok(map
        .into_iter()
        .filter_map(|(id, value)| {
            serde_json::from_value::<SlackField>(value)
                .ok()
                .map(|field| (id, field))
        })
        .collect())
}

impl From<SlackUser> for UserProfile {
    fn from(user: SlackUser) -> Self {
        let profile = user.profile;
        let real_name = if profile.real_name.is_empty() {
            user.real_name.unwrap_or_default()
        } else {
            profile.real_name
        };

        Self {
            id: user.id,
            display_name: profile.display_name,
            real_name,
            first_name: profile.first_name,
            title: profile.title,
            avatar_url: profile
                .image_192
                .or(profile.image_72)
                .filter(|url| !url.is_empty()),
            fields: profile
                .fields
                .into_iter()
                .filter_map(|(id, field)| field.value.map(|value| (id, value)))
                .collect(),
        }
    }
}
