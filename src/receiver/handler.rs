use lambda_http::{Body, Error, Request, Response};

use crate::config::{Config, RequesterNudge};
use crate::directory::{Directory, UserProfile};
use crate::error::WebhookError;
use crate::fields::{
    extract_custom_fields, extract_mentioned_user_id, labels, list_missing_fields, ProfileField,
};
use crate::message::{build_floor_plan_link, build_reply_blocks, build_reply_sentence, Followup};
use crate::notify::Notifier;
use crate::types::{NudgeJob, NudgeKind, SlackCommand, SlackResponse};
use crate::verify::{verify_method, verify_slack_signature, verify_token};

pub const NOT_FOUND_TEXT: &str = "No Slack user found with this username. Try again";
const DEFAULT_COMMAND: &str = "/whois";

/// One slash-command round trip: verify, look up, compose, nudge, reply.
pub struct Webhook<D, N> {
    config: Config,
    directory: D,
    notifier: N,
}

impl<D: Directory, N: Notifier> Webhook<D, N> {
    pub fn new(config: Config, directory: D, notifier: N) -> Self {
        Self {
            config,
            directory,
            notifier,
        }
    }

    /// Always produces exactly one response, errors included.
    pub async fn handle(&self, event: Request) -> Result<Response<Body>, Error> {
        let outcome = match self.process(&event).await {
            Ok(reply) => serde_json::to_string(&reply).map_err(WebhookError::from),
            Err(e) => Err(e),
        };

        let (status, body) = match outcome {
            Ok(body) => (200, body),
            Err(e) => {
                if e.status() >= 500 {
                    tracing::error!(error = %e, "Slash command failed");
                } else {
                    tracing::warn!(error = %e, status = e.status(), "Slash command rejected");
                }
                let reply = SlackResponse::error(e.reply_text());
                (e.status(), serde_json::to_string(&reply)?)
            }
        };

        Ok(Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(body))?)
    }

    async fn process(&self, event: &Request) -> Result<SlackResponse, WebhookError> {
        verify_method(event.method())?;

        let body = std::str::from_utf8(event.body()).ok();

        if let Some(secret) = &self.config.signing_secret {
            verify_slack_signature(
                secret,
                body.unwrap_or_default(),
                header(event, "X-Slack-Request-Timestamp"),
                header(event, "X-Slack-Signature"),
            )?;
        }

        let command = verify_token(body.and_then(parse_command), &self.config.command_token)?;
        tracing::info!(
            user_id = %command.user_id,
            command = %command.command,
            "Slash command received"
        );

        let Some(mentioned_id) = extract_mentioned_user_id(&command.text) else {
            return Ok(SlackResponse::text(usage_hint(&command)));
        };

        let (requestee, requester) = tokio::join!(
            self.directory.fetch_user_profile(&mentioned_id),
            self.fetch_requester(&command, &mentioned_id),
        );

        let Some(requestee) = requestee else {
            return Ok(SlackResponse::text(NOT_FOUND_TEXT));
        };

        Ok(self.compose(&command, &requestee, requester.as_ref()).await)
    }

    /// `None` when the requester is the person being looked up.
    async fn fetch_requester(
        &self,
        command: &SlackCommand,
        mentioned_id: &str,
    ) -> Option<UserProfile> {
        if command.user_id.is_empty() || command.user_id == mentioned_id {
            return None;
        }
        self.directory.fetch_user_profile(&command.user_id).await
    }

    async fn compose(
        &self,
        command: &SlackCommand,
        requestee: &UserProfile,
        requester: Option<&UserProfile>,
    ) -> SlackResponse {
        let fields = extract_custom_fields(requestee, &self.config.fields);
        let missing = list_missing_fields(&fields, &self.config.fields);
        let mut followups = Vec::new();

        let requested_by = requester
            .map(|profile| profile.name().to_string())
            .or_else(|| Some(command.user_name.clone()).filter(|name| !name.is_empty()));

        if self.config.nudge_requestee && !missing.is_empty() {
            self.notifier
                .dispatch(nudge_job(requestee, NudgeKind::Requestee, &missing, requested_by))
                .await;
            followups.push(Followup::RequesteeNudged {
                missing: missing.clone(),
                reminder_sent: self.notifier.delivers(),
            });
        }

        if let Some(requester) = requester {
            let requester_fields = extract_custom_fields(requester, &self.config.fields);
            let requester_missing = list_missing_fields(&requester_fields, &self.config.fields);

            if !requester_missing.is_empty() {
                match self.config.requester_nudge {
                    RequesterNudge::Inline => followups.push(Followup::RequesterIncomplete {
                        missing: requester_missing,
                        profile_edit_url: self.config.profile_edit_url.clone(),
                    }),
                    RequesterNudge::Direct => {
                        self.notifier
                            .dispatch(nudge_job(
                                requester,
                                NudgeKind::Requester,
                                &requester_missing,
                                None,
                            ))
                            .await;
                    }
                    RequesterNudge::Off => {}
                }
            }
        }

        let floor_plan_link = self
            .config
            .floor_plan
            .as_ref()
            .and_then(|plan| build_floor_plan_link(&fields, plan));

        SlackResponse::blocks(
            build_reply_sentence(requestee, &fields),
            build_reply_blocks(requestee, &fields, floor_plan_link.as_deref(), &followups),
        )
    }
}

fn parse_command(body: &str) -> Option<SlackCommand> {
    if body.trim().is_empty() {
        return None;
    }
    serde_urlencoded::from_str(body).ok()
}

fn header<'a>(event: &'a Request, name: &str) -> &'a str {
    event
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

fn usage_hint(command: &SlackCommand) -> String {
    let name = if command.command.is_empty() {
        DEFAULT_COMMAND
    } else {
        command.command.as_str()
    };
    format!(
        "Mention someone to look them up, e.g. `{} @colleague`",
        name
    )
}

fn nudge_job(
    profile: &UserProfile,
    kind: NudgeKind,
    missing: &[ProfileField],
    requested_by: Option<String>,
) -> NudgeJob {
    NudgeJob {
        recipient_id: profile.id.clone(),
        recipient_name: profile.name().to_string(),
        kind,
        missing_fields: labels(missing),
        requested_by,
        enqueued_at: chrono::Utc::now().to_rfc3339(),
    }
}
