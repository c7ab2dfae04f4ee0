use thiserror::Error;

/// Failure fetching or decoding spreadsheet-backed data. Always recoverable:
/// callers fall back to a previous or empty list and show a notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Feed returned HTTP {0}")]
    Status(u16),
    #[error("Response too short for the feed envelope ({0} chars)")]
    Envelope(usize),
    #[error("JSON parse error: {0}")]
    JsonParse(String),
    #[error("Unexpected feed shape: {0}")]
    UnexpectedShape(String),
}

impl FeedError {
    /// Banner text shown instead of the live data.
    pub fn user_message(&self) -> &'static str {
        match self {
            FeedError::Network(_) | FeedError::Status(_) => {
                "فشل جلب المعطيات المركزية. تحقق من الاتصال ثم أعد المحاولة."
            }
            FeedError::Envelope(_) | FeedError::JsonParse(_) | FeedError::UnexpectedShape(_) => {
                "تعذرت قراءة المعطيات المركزية (تغير تنسيق الجدول)."
            }
        }
    }
}
