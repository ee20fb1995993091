use serde::{Deserialize, Deserializer};

use crate::domain::errors::RelayError;

/// One chat message picked up by the monitoring side and queued for relaying.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepostEvent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub chat_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chat_icon: String,
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<String>,
}

impl RepostEvent {
    pub fn decode(payload: &[u8]) -> Result<Self, RelayError> {
        Ok(serde_json::from_slice(payload)?)
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
