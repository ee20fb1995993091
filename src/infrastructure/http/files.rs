use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};

use crate::{application::services::webhook::FileFetcher, domain::models::Attachment};

pub struct HttpFileFetcher {
    http: Client,
}

impl HttpFileFetcher {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl FileFetcher for HttpFileFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<Attachment> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to request {url}"))?
            .error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("failed to read body of {url}"))?;

        Ok(Attachment::new(url, content_type, bytes.to_vec()))
    }
}
