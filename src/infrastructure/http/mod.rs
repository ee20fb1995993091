use std::time::Duration;

use anyhow::Context;
use reqwest::Client;

pub mod files;
pub mod webhook;

pub use files::HttpFileFetcher;
pub use webhook::HttpWebhookClient;

/// Shared reqwest client for file downloads and webhook posts.
///
/// Without a timeout the client waits as long as the peer keeps the connection open.
pub fn build_client(timeout: Option<Duration>) -> anyhow::Result<Client> {
    let mut builder = Client::builder().user_agent(concat!("reposter/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("failed to build http client")
}
