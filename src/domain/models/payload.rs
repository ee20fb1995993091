use serde::{Deserialize, Serialize};

use crate::domain::events::RepostEvent;

/// Content used when the original text is blank on a first delivery attempt.
pub const UNAVAILABLE_PLACEHOLDER: &str = "[Original message unavailable]";
/// Content used when the text-only fallback replaces a rejected multipart delivery.
pub const TOO_LARGE_PLACEHOLDER: &str = "[Original entity too large]";

/// JSON body understood by the webhook, either on its own or as the
/// `payload_json` field of a multipart request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub content: String,
    pub username: String,
    pub avatar_url: String,
}

impl WebhookPayload {
    pub fn primary(event: &RepostEvent) -> Self {
        Self::with_placeholder(event, UNAVAILABLE_PLACEHOLDER)
    }

    pub fn fallback(event: &RepostEvent) -> Self {
        Self::with_placeholder(event, TOO_LARGE_PLACEHOLDER)
    }

    fn with_placeholder(event: &RepostEvent, placeholder: &str) -> Self {
        let content = if is_blank(&event.text) {
            placeholder.to_string()
        } else {
            event.text.clone()
        };

        Self {
            content,
            username: event.chat_name.clone(),
            avatar_url: event.chat_icon.clone(),
        }
    }
}

/// Blank means empty or only line breaks, tabs and breaking spaces.
/// Non-breaking spaces count as content.
fn is_blank(text: &str) -> bool {
    text.chars().all(|c| match c {
        '\u{001C}'..='\u{001F}' => true,
        '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{0085}' => false,
        c => c.is_whitespace(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(text: &str) -> RepostEvent {
        RepostEvent {
            chat_name: "Ops".to_string(),
            chat_icon: "http://i/a.png".to_string(),
            text: text.to_string(),
            files: vec![],
        }
    }

    #[test]
    fn keeps_text_verbatim() {
        let text = "  line one\nline two  ";
        let payload = WebhookPayload::primary(&event(text));
        assert_eq!(payload.content, text);
        assert_eq!(payload.username, "Ops");
        assert_eq!(payload.avatar_url, "http://i/a.png");

        assert_eq!(WebhookPayload::fallback(&event(text)).content, text);
    }

    #[test]
    fn blank_text_uses_placeholders() {
        for text in ["", " ", "\n\t  "] {
            assert_eq!(
                WebhookPayload::primary(&event(text)).content,
                UNAVAILABLE_PLACEHOLDER
            );
            assert_eq!(
                WebhookPayload::fallback(&event(text)).content,
                TOO_LARGE_PLACEHOLDER
            );
        }
    }

    #[test]
    fn non_breaking_spaces_are_content() {
        for text in ["\u{00A0}", "\u{2007}", " \u{202F} "] {
            assert_eq!(WebhookPayload::primary(&event(text)).content, text);
            assert_eq!(WebhookPayload::fallback(&event(text)).content, text);
        }
    }

    #[test]
    fn separator_controls_are_blank() {
        assert_eq!(
            WebhookPayload::primary(&event("\u{001F}\u{2003}\r\n")).content,
            UNAVAILABLE_PLACEHOLDER
        );
    }

    #[test]
    fn serializes_webhook_field_names() {
        let value = serde_json::to_value(WebhookPayload::primary(&event("hello"))).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "content": "hello",
                "username": "Ops",
                "avatar_url": "http://i/a.png",
            })
        );
    }
}
