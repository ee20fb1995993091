use anyhow::Context;
use async_trait::async_trait;
use reqwest::{
    Client,
    multipart::{Form, Part},
};

use crate::{
    application::services::webhook::WebhookClient,
    domain::models::{Attachment, WebhookPayload},
};

pub struct HttpWebhookClient {
    http: Client,
    webhook_url: String,
}

impl HttpWebhookClient {
    pub fn new(http: Client, webhook_url: impl Into<String>) -> Self {
        Self {
            http,
            webhook_url: webhook_url.into(),
        }
    }

    fn build_form(payload: &WebhookPayload, attachments: Vec<Attachment>) -> anyhow::Result<Form> {
        let payload_json = Part::text(serde_json::to_string(payload)?)
            .mime_str("application/json")?;

        let mut form = Form::new().part("payload_json", payload_json);
        for (index, attachment) in attachments.into_iter().enumerate() {
            let part = Part::bytes(attachment.bytes)
                .file_name(attachment.file_name)
                .mime_str(&attachment.content_type)?;
            form = form.part(attachment_field(index), part);
        }
        Ok(form)
    }
}

/// Multipart field name for the attachment at zero-based `index`.
fn attachment_field(index: usize) -> String {
    format!("file{}", index + 1)
}

#[async_trait]
impl WebhookClient for HttpWebhookClient {
    async fn post_json(&self, payload: &WebhookPayload) -> anyhow::Result<()> {
        self.http
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await
            .context("failed to reach webhook")?
            .error_for_status()?;
        Ok(())
    }

    async fn post_multipart(
        &self,
        payload: &WebhookPayload,
        attachments: Vec<Attachment>,
    ) -> anyhow::Result<()> {
        let form = Self::build_form(payload, attachments)?;
        self.http
            .post(&self.webhook_url)
            .multipart(form)
            .send()
            .await
            .context("failed to reach webhook")?
            .error_for_status()?;
        Ok(())
    }
}
