use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, TableError};
use crate::types::{Entry, EntryKey};

/// A client's full replacement entry set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveRequest {
    pub entries: Vec<Entry>,
    /// Keys of the entries the client fetched. When present, a task line
    /// whose key is listed here but which no submitted entry claims is
    /// treated as deleted rather than preserved.
    pub baseline: Option<Vec<EntryKey>>,
}

#[derive(Deserialize)]
struct Envelope {
    entries: Vec<Entry>,
    #[serde(default)]
    baseline: Option<Vec<EntryKey>>,
}

impl SaveRequest {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            baseline: None,
        }
    }

    pub fn with_baseline(mut self, baseline: Vec<EntryKey>) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// Decode a request body.
    ///
    /// Accepts either a bare JSON array of entries or an
    /// `{"entries": [...], "baseline": [...]}` object.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| TableError::Malformed(e.to_string()))?;

        let request = if value.is_array() {
            Self::new(
                serde_json::from_value(value).map_err(|e| TableError::Malformed(e.to_string()))?,
            )
        } else if value.is_object() {
            let envelope: Envelope =
                serde_json::from_value(value).map_err(|e| TableError::Malformed(e.to_string()))?;
            Self {
                entries: envelope.entries,
                baseline: envelope.baseline,
            }
        } else {
            return Err(TableError::Malformed(format!(
                "expected an array of entries or an object, got {}",
                json_kind(&value)
            )));
        };

        request.validate()?;
        Ok(request)
    }

    /// Reject fields that would split into several table lines.
    pub fn validate(&self) -> Result<()> {
        for (index, entry) in self.entries.iter().enumerate() {
            for (field, text) in entry.text_fields() {
                if text.contains(|c: char| c == '\n' || c == '\r') {
                    return Err(TableError::LineBreak { index, field });
                }
            }
        }
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
