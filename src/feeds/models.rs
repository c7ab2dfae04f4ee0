use serde::Deserialize;
use serde_json::Value;

// response
//  ├── status          "ok" | "warning" | "error"
//  ├── errors[]        { reason, message, detailed_message }
//  └── table
//       └── rows[]
//            └── c[]   null | { v, f }

#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    pub status: Option<String>,
    #[serde(default)]
    pub errors: Vec<FeedIssue>,
    pub table: Option<FeedTable>,
}

#[derive(Debug, Deserialize)]
pub struct FeedIssue {
    pub reason: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "detailed_message")]
    pub detailed_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedTable {
    #[serde(default)]
    pub rows: Vec<FeedRow>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedRow {
    #[serde(default)]
    pub c: Vec<Option<FeedCell>>,
}

/// Only the raw value `v` is read; the formatted `f` is ignored.
#[derive(Debug, Deserialize)]
pub struct FeedCell {
    pub v: Option<Value>,
}

impl FeedRow {
    /// Raw value at `index`; short rows, null cells and null values are all absent.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.c
            .get(index)
            .and_then(|cell| cell.as_ref())
            .and_then(|cell| cell.v.as_ref())
            .filter(|v| !v.is_null())
    }

    pub fn text(&self, index: usize) -> Option<String> {
        self.value(index).and_then(super::cell_text)
    }

    pub fn number(&self, index: usize) -> Option<f64> {
        self.value(index).and_then(super::cell_number)
    }
}
