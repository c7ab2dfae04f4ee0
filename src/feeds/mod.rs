pub mod cache;
pub mod client;
pub mod columns;
pub mod envelope;
mod feed_error;
pub mod models;

use serde_json::Value;

pub use cache::{FeedCache, FeedSnapshot};
pub use client::{FeedClient, FeedNamespace, FeedOrdering, FeedSource, HttpFeedSource};
pub use feed_error::FeedError;

/// Text form of a cell value. Empty strings and nulls are absent; integral
/// numbers print without a fractional part (`212600000.0` -> `"212600000"`).
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().map(|f| {
                    if f.fract() == 0.0 && f.abs() < 1e15 {
                        format!("{}", f as i64)
                    } else {
                        f.to_string()
                    }
                })
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Numeric cells, or text cells holding a number.
pub fn cell_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|f| f.is_finite())
}
