use std::env::var;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;
use thiserror::Error;

use crate::infrastructure::messaging::jetstream::JetstreamConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub webhook_url: String,
    pub http_timeout: Option<Duration>,
    pub jetstream: JetstreamConfig,
}

impl Config {
    pub fn try_parse() -> Result<Config, ConfigError> {
        let _ = dotenv();
        Self::from_lookup(|name| var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let webhook_url = lookup("WEBHOOK_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("WEBHOOK_URL"))?;

        let http_timeout =
            parse_optional::<u64, _>(&lookup, "HTTP_TIMEOUT_SECONDS")?.map(Duration::from_secs);

        Ok(Config {
            webhook_url,
            http_timeout,
            jetstream: JetstreamConfig {
                url: lookup("NATS_URL").unwrap_or_else(|| "nats://127.0.0.1:4222".to_string()),
                stream: lookup("NATS_STREAM").unwrap_or_else(|| "REPOSTS".to_string()),
                subject: lookup("NATS_SUBJECT").unwrap_or_else(|| "reposts".to_string()),
                durable: lookup("NATS_DURABLE").unwrap_or_else(|| "reposter".to_string()),
                pull_batch: parse_optional(&lookup, "NATS_PULL_BATCH")?.unwrap_or(10),
                ack_wait_seconds: parse_optional(&lookup, "NATS_ACK_WAIT_SECONDS")?.unwrap_or(60),
                max_deliver: parse_optional(&lookup, "NATS_MAX_DELIVER")?.unwrap_or(1),
            },
        })
    }
}

fn parse_optional<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn parse(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn webhook_url_is_required() {
        assert!(matches!(parse(&[]), Err(ConfigError::Missing("WEBHOOK_URL"))));
        assert!(matches!(
            parse(&[("WEBHOOK_URL", "  ")]),
            Err(ConfigError::Missing("WEBHOOK_URL"))
        ));
    }

    #[test]
    fn applies_defaults() {
        let config = parse(&[("WEBHOOK_URL", "https://hooks.example/abc")]).unwrap();

        assert_eq!(config.webhook_url, "https://hooks.example/abc");
        assert_eq!(config.http_timeout, None);
        assert_eq!(config.jetstream.url, "nats://127.0.0.1:4222");
        assert_eq!(config.jetstream.stream, "REPOSTS");
        assert_eq!(config.jetstream.subject, "reposts");
        assert_eq!(config.jetstream.durable, "reposter");
        assert_eq!(config.jetstream.pull_batch, 10);
        assert_eq!(config.jetstream.ack_wait_seconds, 60);
        assert_eq!(config.jetstream.max_deliver, 1);
    }

    #[test]
    fn reads_overrides() {
        let config = parse(&[
            ("WEBHOOK_URL", "https://hooks.example/abc"),
            ("HTTP_TIMEOUT_SECONDS", "30"),
            ("NATS_URL", "nats://broker:4222"),
            ("NATS_SUBJECT", "tg.reposts"),
            ("NATS_PULL_BATCH", "1"),
            ("NATS_MAX_DELIVER", "5"),
        ])
        .unwrap();

        assert_eq!(config.http_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.jetstream.url, "nats://broker:4222");
        assert_eq!(config.jetstream.subject, "tg.reposts");
        assert_eq!(config.jetstream.pull_batch, 1);
        assert_eq!(config.jetstream.max_deliver, 5);
    }

    #[test]
    fn rejects_unparseable_numbers() {
        let err = parse(&[
            ("WEBHOOK_URL", "https://hooks.example/abc"),
            ("NATS_PULL_BATCH", "many"),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Invalid { name: "NATS_PULL_BATCH", .. }
        ));
    }
}
