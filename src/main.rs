use std::sync::Arc;

use anyhow::Context;
use tokio::main;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use reposter::{
    application::handlers::repost_relay::RepostRelayHandler,
    config::Config,
    infrastructure::{
        http::{HttpFileFetcher, HttpWebhookClient, build_client},
        messaging::jetstream::JetstreamWorker,
    },
};

#[main]
async fn main() {
    // loads .env, so it has to run before the log settings are read
    let config = match Config::try_parse() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    info!(subject = %config.jetstream.subject, "Starting reposter");

    let http = build_client(config.http_timeout)?;
    let handler = Arc::new(RepostRelayHandler::new(
        Arc::new(HttpWebhookClient::new(http.clone(), config.webhook_url.clone())),
        Arc::new(HttpFileFetcher::new(http)),
    ));

    let worker = JetstreamWorker::connect(&config.jetstream)
        .await?
        .spawn(handler);

    tokio::select! {
        result = worker => {
            result.context("worker task panicked")?;
            anyhow::bail!("worker exited");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for shutdown signal")?;
            info!("Shutting down");
        }
    }

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,reposter=debug"));

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
