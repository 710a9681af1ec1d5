//! Inbound message decoding.
//!
//! A message is a JSON envelope whose `data` field holds a base64-encoded JSON
//! payload:
//!
//! ```text
//! {"data": "eyJVcmwiOiAiaHR0cHM6Ly9leGFtcGxlLmNvbS9hLmpwZyIsICJFdmVudElEIjogImUxIn0="}
//!          └─ {"Url": "https://example.com/a.jpg", "EventID": "e1"}
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("message data is not valid base64: {0}")]
    BadEncoding(#[from] base64::DecodeError),
    #[error("message payload is not a valid request: {0}")]
    BadFormat(#[from] serde_json::Error),
}

/// The envelope delivered by the message bus.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PubSubMessage {
    pub data: String,
}

/// A decoded request to process one image.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProcessingRequest {
    #[serde(rename = "Url")]
    pub url: String,
    #[serde(rename = "EventID", default)]
    pub event_id: Option<String>,
}

impl ProcessingRequest {
    /// Where derived images for this request are namespaced.
    ///
    /// Falls back to `fallback` (a message or invocation id) when the payload
    /// carries no usable event id.
    pub fn destination_id<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.event_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => fallback,
        }
    }
}

pub fn decode(message: &PubSubMessage) -> Result<ProcessingRequest, DecodeError> {
    let payload = STANDARD.decode(message.data.trim())?;
    let request = serde_json::from_slice(&payload)?;
    Ok(request)
}
