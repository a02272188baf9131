//! Messages exchanged with the browser.
//!
//! The transport itself lives outside this crate; it only has to move these
//! JSON documents:
//!
//! ```text
//! client -> server  {"widgetId": 3, "eventType": "value_changed", "value": "7"}
//! server -> client  {"type": "full", "html": "..."}
//!                   {"type": "patch", "fragments": {"3": "..."}}
//!                   {"type": "message", "text": "Label 4 is created."}
//! ```

use pancake_ui::{EventKind, Patch, Value, WidgetId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inbound message could not be decoded.
#[derive(Debug)]
pub enum EventError {
    /// The payload is not valid JSON or misses a required field.
    Malformed {
        /// The decoder's description of the problem.
        message: String,
    },

    /// `eventType` was empty.
    MissingEventType,
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::Malformed { message } => write!(f, "Malformed event message: {}", message),
            EventError::MissingEventType => write!(f, "Event message has an empty eventType"),
        }
    }
}

impl std::error::Error for EventError {}

impl From<serde_json::Error> for EventError {
    fn from(err: serde_json::Error) -> Self {
        EventError::Malformed {
            message: err.to_string(),
        }
    }
}

/// A decoded client event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    pub widget_id: WidgetId,
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl InboundEvent {
    pub fn new(widget_id: WidgetId, kind: impl Into<EventKind>, value: Option<Value>) -> Self {
        Self {
            widget_id,
            event_type: kind.into().as_str().to_string(),
            value,
        }
    }

    /// Decode a message received from the client.
    pub fn from_json(text: &str) -> Result<Self, EventError> {
        let event: InboundEvent = serde_json::from_str(text)?;
        if event.event_type.trim().is_empty() {
            return Err(EventError::MissingEventType);
        }
        Ok(event)
    }

    pub fn kind(&self) -> EventKind {
        EventKind::parse(&self.event_type)
    }
}

/// A message for the client. Encoded only; the client does the decoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RenderMessage {
    /// Replace the whole page.
    Full { html: String },
    /// Replace the listed fragments, keyed by widget id.
    Patch { fragments: Patch },
    /// Show a short notification.
    Message { text: String },
}

impl RenderMessage {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
