use crate::config::EnvelopeConfig;
use crate::feeds::models::{FeedResponse, FeedTable};
use crate::feeds::FeedError;

/// Cuts the fixed non-JSON wrapper off a gviz response.
///
/// Counts characters, not bytes, so a changed envelope produces a JSON
/// error rather than a split UTF-8 sequence.
pub fn strip_envelope<'a>(text: &'a str, envelope: &EnvelopeConfig) -> Result<&'a str, FeedError> {
    let total = text.chars().count();
    if total < envelope.prefix_chars + envelope.suffix_chars {
        return Err(FeedError::Envelope(total));
    }

    let start = byte_offset(text, envelope.prefix_chars);
    let end = byte_offset(text, total - envelope.suffix_chars);
    Ok(&text[start..end])
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Envelope-wrapped body to table.
pub fn parse_feed(text: &str, envelope: &EnvelopeConfig) -> Result<FeedTable, FeedError> {
    let json = strip_envelope(text, envelope)?;
    let response: FeedResponse =
        serde_json::from_str(json).map_err(|e| FeedError::JsonParse(e.to_string()))?;

    if response.status.as_deref() == Some("error") {
        let detail = response
            .errors
            .iter()
            .filter_map(|e| {
                e.detailed_message
                    .as_deref()
                    .or(e.message.as_deref())
                    .or(e.reason.as_deref())
            })
            .collect::<Vec<_>>()
            .join("; ");
        return Err(FeedError::UnexpectedShape(format!("feed reported error: {detail}")));
    }

    response
        .table
        .ok_or_else(|| FeedError::UnexpectedShape("table missing".to_string()))
}
