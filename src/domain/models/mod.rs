pub mod attachment;
pub mod payload;

pub use attachment::{Attachment, file_name_from_url};
pub use payload::{TOO_LARGE_PLACEHOLDER, UNAVAILABLE_PLACEHOLDER, WebhookPayload};
