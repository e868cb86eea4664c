use serde::de::DeserializeOwned;
use std::fmt;
use toolchat_core_types::EncodedRecord;

/// Why an encoded record could not be turned into its typed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub reason: String,
}

impl DecodeError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for DecodeError {}

impl From<serde_json::Error> for DecodeError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(error.to_string())
    }
}

/// Decode JSON text into `T`.
pub fn decode_str<T: DeserializeOwned>(raw: &str) -> Result<T, DecodeError> {
    Ok(serde_json::from_str(raw)?)
}

/// Decode an encoded record into `T`, whichever form the caller sent it in.
pub fn decode_record<T: DeserializeOwned>(record: &EncodedRecord) -> Result<T, DecodeError> {
    match record {
        EncodedRecord::Text(raw) => decode_str(raw),
        EncodedRecord::Inline(value) => Ok(serde_json::from_value(value.clone())?),
    }
}
