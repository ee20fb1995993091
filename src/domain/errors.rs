use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("malformed repost event: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("webhook delivery failed: {0:#}")]
    Delivery(anyhow::Error),
}

impl RelayError {
    /// Whether the broker could plausibly succeed by redelivering the message.
    pub fn is_redeliverable(&self) -> bool {
        matches!(self, RelayError::Delivery(_))
    }
}
