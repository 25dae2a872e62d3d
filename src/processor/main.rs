#[path = "../blocks.rs"]
#[allow(dead_code)]
mod blocks;
#[path = "../config_util.rs"]
mod config_util;
#[path = "../types.rs"]
#[allow(dead_code)]
mod types;

mod config;
mod nudge;
mod slack;

use aws_lambda_events::event::sqs::SqsEvent;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;

use config::NotifierConfig;
use slack::SlackMessenger;
use types::NudgeJob;

struct Processor {
    config: NotifierConfig,
    messenger: SlackMessenger,
}

impl Processor {
    /// Each record is tried once. Failures are logged so one bad nudge
    /// neither blocks the batch nor gets redelivered.
    async fn function_handler(&self, event: LambdaEvent<SqsEvent>) -> Result<(), Error> {
        for record in event.payload.records {
            let Some(body) = record.body else {
                continue;
            };

            let job: NudgeJob = match serde_json::from_str(&body) {
                Ok(job) => job,
                Err(e) => {
                    tracing::error!(
                        message_id = ?record.message_id,
                        error = %e,
                        "Dropping malformed nudge"
                    );
                    continue;
                }
            };

            let message = nudge::build_nudge_message(&job, &self.config);
            match self.messenger.post_message(&message).await {
                Ok(()) => tracing::info!(
                    recipient = %job.recipient_id,
                    kind = ?job.kind,
                    "Nudge delivered"
                ),
                Err(e) => tracing::warn!(
                    recipient = %job.recipient_id,
                    error = %e,
                    "Failed to deliver nudge"
                ),
            }
        }

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .without_time()
        .init();

    let config = NotifierConfig::from_env()?;
    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;
    let messenger = SlackMessenger::new(
        client,
        config.api_base.clone(),
        config.api_token.clone(),
        config.dry_run,
    );
    let processor = Arc::new(Processor { config, messenger });

    run(service_fn(move |event: LambdaEvent<SqsEvent>| {
        let processor = Arc::clone(&processor);
        async move { processor.function_handler(event).await }
    }))
    .await
}
