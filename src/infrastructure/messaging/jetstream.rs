use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_nats::jetstream::{
    self, AckKind,
    consumer::{AckPolicy, PullConsumer, pull},
};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tracing::{debug, error, info, warn};

use crate::{
    application::handlers::repost_relay::{DeliveryOutcome, RepostRelayHandler},
    domain::errors::RelayError,
};

#[derive(Debug, Clone)]
pub struct JetstreamConfig {
    pub url: String,
    pub stream: String,
    pub subject: String,
    pub durable: String,
    pub pull_batch: usize,
    pub ack_wait_seconds: u64,
    pub max_deliver: i64,
}

pub struct JetstreamWorker {
    consumer: PullConsumer,
    pull_batch: usize,
}

impl JetstreamWorker {
    pub async fn connect(config: &JetstreamConfig) -> anyhow::Result<Self> {
        let client = async_nats::connect(&config.url)
            .await
            .with_context(|| format!("failed to connect to {}", config.url))?;
        let context = jetstream::new(client);

        let stream = context
            .get_or_create_stream(jetstream::stream::Config {
                name: config.stream.clone(),
                subjects: vec![config.subject.clone()],
                ..Default::default()
            })
            .await
            .context("failed to open repost stream")?;

        let consumer = stream
            .get_or_create_consumer(
                &config.durable,
                pull::Config {
                    durable_name: Some(config.durable.clone()),
                    ack_policy: AckPolicy::Explicit,
                    ack_wait: Duration::from_secs(config.ack_wait_seconds),
                    max_deliver: config.max_deliver,
                    ..Default::default()
                },
            )
            .await
            .context("failed to open repost consumer")?;

        info!(
            stream = %config.stream,
            subject = %config.subject,
            durable = %config.durable,
            "Connected to JetStream"
        );

        Ok(Self {
            consumer,
            pull_batch: config.pull_batch,
        })
    }

    pub fn spawn(self, handler: Arc<RepostRelayHandler>) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.run(handler).await {
                error!("JetStream worker stopped: {e:#}");
            }
        })
    }

    async fn run(self, handler: Arc<RepostRelayHandler>) -> anyhow::Result<()> {
        loop {
            let mut batch = self
                .consumer
                .batch()
                .max_messages(self.pull_batch)
                .messages()
                .await?;
            while let Some(message) = batch.next().await {
                match message {
                    Ok(msg) => {
                        if let Err(e) = Self::process_message(msg, &handler).await {
                            warn!("Failed to settle message: {e:#}");
                        }
                    }
                    Err(e) => {
                        warn!("JetStream batch error: {e}");
                    }
                }
            }
        }
    }

    async fn process_message(
        message: jetstream::Message,
        handler: &RepostRelayHandler,
    ) -> anyhow::Result<()> {
        let result = handler.handle_raw(&message.payload).await;
        match &result {
            Ok(outcome) => debug!(?outcome, "Repost relayed"),
            Err(e) if e.is_redeliverable() => error!("Repost not delivered: {e}"),
            Err(e) => warn!("Dropping repost: {e}"),
        }

        message
            .ack_with(settlement(&result))
            .await
            .map_err(|e| anyhow::anyhow!("failed to settle message: {e}"))
    }
}

/// How a relayed message is settled with the broker.
///
/// Malformed payloads are terminated since redelivery cannot fix them;
/// delivery failures are nak'd and the consumer's `max_deliver` bounds
/// how often the broker tries again.
fn settlement(result: &Result<DeliveryOutcome, RelayError>) -> AckKind {
    match result {
        Ok(_) => AckKind::Ack,
        Err(e) if e.is_redeliverable() => AckKind::Nak(None),
        Err(_) => AckKind::Term,
    }
}
