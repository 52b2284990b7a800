//! Utterance batch files and the per-item validation applied before upload.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("utterance is not a JSON object")]
    NotAnObject,
    #[error("utterance has no text")]
    MissingText,
    #[error("utterance has no intent")]
    MissingIntent,
}

fn non_empty_str<'a>(utterance: &'a Value, field: &str) -> Option<&'a str> {
    utterance
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

pub fn validate_utterance(utterance: &Value) -> Result<(), ValidationError> {
    if !utterance.is_object() {
        return Err(ValidationError::NotAnObject);
    }
    if non_empty_str(utterance, "text").is_none() {
        return Err(ValidationError::MissingText);
    }
    if non_empty_str(utterance, "intent").is_none() {
        return Err(ValidationError::MissingIntent);
    }
    Ok(())
}

/// The `utterances` array of a batch file, if it has one.
pub fn batch_items(batch: &Value) -> Option<&[Value]> {
    batch
        .get("utterances")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UtteranceFailure {
    pub index: usize,
    pub reason: String,
}

/// Tally of one batch upload. Failures never stop the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UtteranceReport {
    pub source: Option<String>,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<UtteranceFailure>,
}

impl UtteranceReport {
    pub fn for_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, index: usize, reason: impl Into<String>) {
        self.failed += 1;
        self.failures.push(UtteranceFailure {
            index,
            reason: reason.into(),
        });
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}
