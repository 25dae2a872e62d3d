use crate::blocks::{escape_mrkdwn, Block, ButtonElement, ButtonStyle};
use crate::config::NotifierConfig;
use crate::slack::PostMessage;
use crate::types::{NudgeJob, NudgeKind};

fn intro(job: &NudgeJob) -> String {
    let recipient = escape_mrkdwn(&job.recipient_name);
    match (job.kind, job.requested_by.as_deref()) {
        (NudgeKind::Requestee, Some(requester)) => format!(
            "Hi {}! {} just looked you up, but your profile is missing a few things:",
            recipient,
            escape_mrkdwn(requester)
        ),
        (NudgeKind::Requestee, None) => format!(
            "Hi {}! Someone just looked you up, but your profile is missing a few things:",
            recipient
        ),
        (NudgeKind::Requester, _) => format!(
            "Hi {}! Thanks for looking someone up. Your own profile is missing a few things too:",
            recipient
        ),
    }
}

/// Direct message asking the recipient to fill in their missing fields.
pub fn build_nudge_message(job: &NudgeJob, config: &NotifierConfig) -> PostMessage {
    let missing: Vec<String> = job
        .missing_fields
        .iter()
        .map(|field| format!("• {}", escape_mrkdwn(field)))
        .collect();

    let text = format!(
        "{}\n{}\nFill them in here: {}",
        intro(job),
        missing.join("\n"),
        config.profile_edit_url
    );

    let blocks = vec![
        Block::section(format!("{}\n{}", intro(job), missing.join("\n"))),
        Block::actions(vec![ButtonElement::link(
            "complete_profile",
            "Complete my profile",
            config.profile_edit_url.clone(),
        )
        .style(ButtonStyle::Primary)]),
    ];

    PostMessage {
        channel: job.recipient_id.clone(),
        username: config.username.clone(),
        icon_emoji: config.icon_emoji.clone(),
        text,
        blocks,
    }
}
