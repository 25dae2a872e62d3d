use lambda_http::{run, service_fn, Error, Request};
use std::sync::Arc;

// Import shared types and local modules
#[path = "../blocks.rs"]
mod blocks;
#[path = "../config_util.rs"]
mod config_util;
#[path = "../types.rs"]
#[allow(dead_code)]
mod types;

mod config;
mod directory;
mod error;
mod fields;
mod handler;
mod message;
mod notify;
mod verify;

use config::Config;
use directory::SlackDirectory;
use handler::Webhook;
use notify::{LogNotifier, Notifier, QueueNotifier};

async fn build_notifier(config: &Config) -> Box<dyn Notifier> {
    match (&config.queue_url, config.dry_run) {
        (Some(queue_url), false) => {
            let aws = aws_config::load_from_env().await;
            Box::new(QueueNotifier::new(
                aws_sdk_sqs::Client::new(&aws),
                queue_url.clone(),
                config.http_timeout,
            ))
        }
        (None, false) => {
            tracing::warn!("SQS_QUEUE_URL is not set; nudges will only be logged");
            Box::new(LogNotifier)
        }
        (_, true) => Box::new(LogNotifier),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .without_time()
        .init();

    let config = Config::from_env()?;

    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;
    let directory = SlackDirectory::new(http, config.api_base.clone(), config.api_token.clone());
    let notifier = build_notifier(&config).await;

    if config.dry_run {
        tracing::info!("Dry run: nudges are logged instead of sent");
    }

    let webhook = Arc::new(Webhook::new(config, directory, notifier));

    run(service_fn(move |event: Request| {
        let webhook = Arc::clone(&webhook);
        async move { webhook.handle(event).await }
    }))
    .await
}
