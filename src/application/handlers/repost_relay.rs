use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::{
    application::services::webhook::{FileFetcher, WebhookClient},
    domain::{
        errors::RelayError,
        events::RepostEvent,
        models::{Attachment, WebhookPayload},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// No files: a single JSON post.
    Json,
    /// Multipart post accepted with this many attachments.
    Multipart { attachments: usize },
    /// Multipart post rejected, text-only JSON post delivered instead.
    Fallback { attachments_dropped: usize },
}

pub struct RepostRelayHandler {
    webhook: Arc<dyn WebhookClient>,
    fetcher: Arc<dyn FileFetcher>,
}

impl RepostRelayHandler {
    pub fn new(webhook: Arc<dyn WebhookClient>, fetcher: Arc<dyn FileFetcher>) -> Self {
        Self { webhook, fetcher }
    }

    pub async fn handle_raw(&self, payload: &[u8]) -> Result<DeliveryOutcome, RelayError> {
        let event = RepostEvent::decode(payload)?;
        self.handle(&event).await
    }

    pub async fn handle(&self, event: &RepostEvent) -> Result<DeliveryOutcome, RelayError> {
        if !event.has_files() {
            self.webhook
                .post_json(&WebhookPayload::primary(event))
                .await
                .map_err(RelayError::Delivery)?;
            info!(chat = %event.chat_name, "Relayed text repost");
            return Ok(DeliveryOutcome::Json);
        }

        let attachments = self.fetch_attachments(&event.files).await;
        let count = attachments.len();

        match self
            .webhook
            .post_multipart(&WebhookPayload::primary(event), attachments)
            .await
        {
            Ok(()) => {
                info!(
                    chat = %event.chat_name,
                    requested = event.files.len(),
                    attached = count,
                    "Relayed repost with files"
                );
                Ok(DeliveryOutcome::Multipart { attachments: count })
            }
            Err(e) => {
                warn!(
                    chat = %event.chat_name,
                    attached = count,
                    "Multipart delivery failed, sending text only: {e:#}"
                );
                self.webhook
                    .post_json(&WebhookPayload::fallback(event))
                    .await
                    .map_err(RelayError::Delivery)?;
                Ok(DeliveryOutcome::Fallback {
                    attachments_dropped: count,
                })
            }
        }
    }

    /// Downloads every file concurrently and keeps the successes in input order.
    async fn fetch_attachments(&self, urls: &[String]) -> Vec<Attachment> {
        let results = join_all(urls.iter().map(|url| self.fetcher.fetch(url))).await;

        results
            .into_iter()
            .zip(urls)
            .filter_map(|(result, url)| match result {
                Ok(attachment) => {
                    debug!(url = %url, size = attachment.bytes.len(), "Fetched file");
                    Some(attachment)
                }
                Err(e) => {
                    warn!(url = %url, "Skipping file: {e:#}");
                    None
                }
            })
            .collect()
    }
}
