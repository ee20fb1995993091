use async_trait::async_trait;

use crate::domain::models::{Attachment, WebhookPayload};

/// Outbound side of the relay: the configured webhook endpoint.
#[async_trait]
pub trait WebhookClient: Send + Sync {
    /// Posts `payload` as an `application/json` body.
    async fn post_json(&self, payload: &WebhookPayload) -> anyhow::Result<()>;

    /// Posts `payload` as the `payload_json` field of a multipart form, with
    /// `attachments` numbered `file1..fileN` in the order given.
    async fn post_multipart(
        &self,
        payload: &WebhookPayload,
        attachments: Vec<Attachment>,
    ) -> anyhow::Result<()>;
}

#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Downloads `url`. Any non-2xx answer is an error.
    async fn fetch(&self, url: &str) -> anyhow::Result<Attachment>;
}
