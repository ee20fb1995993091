use mime_guess::mime::Mime;

/// A downloaded file ready to be attached to a multipart webhook request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Keeps `content_type` when it parses as a mime type, otherwise guesses
    /// from the file extension.
    pub fn new(url: &str, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name_from_url(url);
        let content_type = content_type
            .and_then(|value| value.parse::<Mime>().ok())
            .unwrap_or_else(|| mime_guess::from_path(file_name).first_or_octet_stream());

        Self {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        }
    }
}

/// Last non-empty path segment of `url`, query string included.
pub fn file_name_from_url(url: &str) -> &str {
    url.rsplit('/').find(|segment| !segment.is_empty()).unwrap_or("")
}
