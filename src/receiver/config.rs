use std::time::Duration;

use crate::config_util::{self, ConfigError, DEFAULT_PROFILE_EDIT_URL};

const DEFAULT_HTTP_TIMEOUT_MS: u64 = 2_500;

/// What to do when the person running the command has gaps in their own profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequesterNudge {
    /// Append a short reminder with a button to the reply itself.
    Inline,
    /// Send the requester a separate direct message.
    Direct,
    Off,
}

impl RequesterNudge {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "inline" => Some(Self::Inline),
            "direct" | "dm" => Some(Self::Direct),
            "off" | "none" => Some(Self::Off),
            _ => None,
        }
    }
}

/// Opaque ids of the custom profile fields this workspace uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIds {
    pub join_date: String,
    pub organisation: String,
    pub office_location: String,
    pub office_floor: String,
    /// Workspace specific and has no default. While unset, desks are never
    /// reported and never counted as missing.
    pub office_desk: Option<String>,
}

impl Default for FieldIds {
    fn default() -> Self {
        Self {
            join_date: "Xf59UWGT47".to_string(),
            organisation: "XfRAV9GY91".to_string(),
            office_location: "Xf58HHDEJV".to_string(),
            office_floor: "XfRNDPVBT2".to_string(),
            office_desk: None,
        }
    }
}

/// Google sheet holding the office floor plans, one tab per floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorPlan {
    pub url: String,
    pub fourth_floor_gid: String,
    pub fifth_floor_gid: String,
}

impl FloorPlan {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fourth_floor_gid: "924686718".to_string(),
            fifth_floor_gid: "0".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret Slack sends as `token` with every slash command.
    pub command_token: String,
    /// When set, `X-Slack-Signature` is checked as well as the token.
    pub signing_secret: Option<String>,
    /// Bot token used for `users.info`.
    pub api_token: String,
    pub api_base: String,
    /// Upper bound for every outbound call (Slack gives us 3s in total).
    pub http_timeout: Duration,
    pub dry_run: bool,
    /// Nudge queue consumed by the processor lambda. Unset means log only.
    pub queue_url: Option<String>,
    pub nudge_requestee: bool,
    pub requester_nudge: RequesterNudge,
    pub profile_edit_url: String,
    pub floor_plan: Option<FloorPlan>,
    pub fields: FieldIds,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| var(key).ok_or(ConfigError::Missing(key));

        let http_timeout = config_util::millis(
            "SLACK_HTTP_TIMEOUT_MS",
            var("SLACK_HTTP_TIMEOUT_MS"),
            DEFAULT_HTTP_TIMEOUT_MS,
        )?;

        let requester_nudge = match var("REQUESTER_NUDGE") {
            Some(raw) => RequesterNudge::parse(&raw).ok_or(ConfigError::Invalid {
                key: "REQUESTER_NUDGE",
                value: raw,
            })?,
            None => RequesterNudge::Inline,
        };

        let floor_plan = var("FLOOR_PLAN_URL").map(|url| {
            let mut plan = FloorPlan::new(url);
            if let Some(gid) = var("FLOOR_PLAN_GID_4") {
                plan.fourth_floor_gid = gid;
            }
            if let Some(gid) = var("FLOOR_PLAN_GID_5") {
                plan.fifth_floor_gid = gid;
            }
            plan
        });

        let defaults = FieldIds::default();
        let fields = FieldIds {
            join_date: var("FIELD_JOIN_DATE").unwrap_or(defaults.join_date),
            organisation: var("FIELD_ORGANISATION").unwrap_or(defaults.organisation),
            office_location: var("FIELD_OFFICE_LOCATION").unwrap_or(defaults.office_location),
            office_floor: var("FIELD_OFFICE_FLOOR").unwrap_or(defaults.office_floor),
            office_desk: var("FIELD_OFFICE_DESK").or(defaults.office_desk),
        };

        Ok(Self {
            command_token: required("SLACK_COMMAND_TOKEN")?,
            signing_secret: var("SLACK_SIGNING_SECRET"),
            api_token: required("SLACK_API_TOKEN")?,
            api_base: config_util::api_base(var("SLACK_API_BASE")),
            http_timeout,
            dry_run: var("DRY_RUN").map(|v| config_util::flag(&v)).unwrap_or(false),
            queue_url: var("SQS_QUEUE_URL"),
            nudge_requestee: var("NUDGE_REQUESTEE")
                .map(|v| config_util::flag(&v))
                .unwrap_or(true),
            requester_nudge,
            profile_edit_url: var("PROFILE_EDIT_URL")
                .unwrap_or_else(|| DEFAULT_PROFILE_EDIT_URL.to_string()),
            floor_plan,
            fields,
        })
    }
}
