//! Uniform success/failure result shape.
//!
//! Every supervisor operation answers with a [`ResponseEnvelope`], and every
//! lifecycle notification pushed to a listener is one as well, so the UI only
//! ever has to understand a single shape.
//!
//! # Wire Format
//!
//! ```json
//! { "success": true,  "payload": { "message": "Node started", "event": "node:started" } }
//! { "success": false, "payload": { "kind": "binary_not_found", "message": "..." } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Category of a failed envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The OS process table could not be enumerated.
    QueryError,
    /// A filesystem check failed for a reason other than non-existence.
    ResolutionError,
    /// The resolved node binary does not exist.
    BinaryNotFound,
    /// The OS refused to create the node process.
    SpawnError,
    /// Signal delivery to one or more PIDs failed.
    TerminationError,
    /// Launch parameters or settings were invalid.
    ConfigurationError,
    /// The node wrote to stderr.
    OutputFailure,
    /// The node process exited without being asked to.
    ProcessExited,
}

impl ErrorKind {
    /// Stable string form, identical to the serialized value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QueryError => "query_error",
            Self::ResolutionError => "resolution_error",
            Self::BinaryNotFound => "binary_not_found",
            Self::SpawnError => "spawn_error",
            Self::TerminationError => "termination_error",
            Self::ConfigurationError => "configuration_error",
            Self::OutputFailure => "output_failure",
            Self::ProcessExited => "process_exited",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured description carried by a failed envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDescription {
    pub kind: ErrorKind,
    /// Human-readable message, always present.
    pub message: String,
    /// Operation-specific context (failed PIDs, exit code, path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Envelope payload: a data mapping on success, an error description on failure.
///
/// Serialized without a tag. On the way back in, the envelope's `success`
/// flag selects the variant, so a data map holding `kind` and `message`
/// keys stays data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Error(ErrorDescription),
    Data(Map<String, Value>),
}

/// The `{success, payload}` result returned by every operation and pushed for
/// every lifecycle notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireEnvelope")]
pub struct ResponseEnvelope {
    pub success: bool,
    pub payload: Payload,
}

#[derive(Deserialize)]
struct WireEnvelope {
    success: bool,
    payload: Value,
}

impl TryFrom<WireEnvelope> for ResponseEnvelope {
    type Error = serde_json::Error;

    fn try_from(wire: WireEnvelope) -> Result<Self, Self::Error> {
        let payload = if wire.success {
            Payload::Data(serde_json::from_value(wire.payload)?)
        } else {
            Payload::Error(serde_json::from_value(wire.payload)?)
        };
        Ok(Self {
            success: wire.success,
            payload,
        })
    }
}

impl ResponseEnvelope {
    /// Successful envelope with an arbitrary data mapping.
    pub const fn ok(data: Map<String, Value>) -> Self {
        Self {
            success: true,
            payload: Payload::Data(data),
        }
    }

    /// Successful envelope carrying only `{"message": ...}`.
    pub fn message(message: impl Into<String>) -> Self {
        let mut data = Map::new();
        data.insert("message".to_string(), Value::String(message.into()));
        Self::ok(data)
    }

    /// Failed envelope.
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: Payload::Error(ErrorDescription {
                kind,
                message: message.into(),
                details: None,
            }),
        }
    }

    /// Attach a field. Data payloads get it inline; error payloads get it
    /// inside `details`.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        match &mut self.payload {
            Payload::Data(data) => {
                data.insert(key, value);
            }
            Payload::Error(error) => match &mut error.details {
                Some(Value::Object(details)) => {
                    details.insert(key, value);
                }
                Some(other) => {
                    let mut details = Map::new();
                    details.insert("value".to_string(), other.take());
                    details.insert(key, value);
                    error.details = Some(Value::Object(details));
                }
                None => {
                    let mut details = Map::new();
                    details.insert(key, value);
                    error.details = Some(Value::Object(details));
                }
            },
        }
        self
    }

    /// Replace the `details` of an error payload. No-op on data payloads.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        if let Payload::Error(error) = &mut self.payload {
            error.details = Some(details);
        }
        self
    }

    /// The human-readable message, if any.
    pub fn message_text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Data(data) => data.get("message").and_then(Value::as_str),
            Payload::Error(error) => Some(&error.message),
        }
    }

    /// Error category of a failed envelope.
    pub const fn error_kind(&self) -> Option<ErrorKind> {
        match &self.payload {
            Payload::Error(error) => Some(error.kind),
            Payload::Data(_) => None,
        }
    }

    /// Look up a field in the data mapping, or in `details` for errors.
    pub fn field(&self, key: &str) -> Option<&Value> {
        match &self.payload {
            Payload::Data(data) => data.get(key),
            Payload::Error(error) => error.details.as_ref().and_then(|d| d.get(key)),
        }
    }

    /// Lifecycle event name (`node:started`, ...) when the envelope was
    /// produced from a lifecycle event.
    pub fn event_name(&self) -> Option<&str> {
        self.field("event").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_envelope_serializes_flat_payload() {
        let envelope = ResponseEnvelope::message("Node already running");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            json!({ "success": true, "payload": { "message": "Node already running" } })
        );
    }

    #[test]
    fn failure_envelope_carries_kind_and_details() {
        let envelope = ResponseEnvelope::failure(ErrorKind::BinaryNotFound, "missing")
            .with_field("path", "/opt/defid");
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"kind\":\"binary_not_found\""));
        assert!(json.contains("\"path\":\"/opt/defid\""));
        assert_eq!(envelope.error_kind(), Some(ErrorKind::BinaryNotFound));
        assert_eq!(envelope.message_text(), Some("missing"));
    }

    #[test]
    fn payload_deserializes_both_shapes() {
        let ok: ResponseEnvelope =
            serde_json::from_str(r#"{"success":true,"payload":{"message":"hi"}}"#).unwrap();
        assert!(matches!(ok.payload, Payload::Data(_)));

        let err: ResponseEnvelope = serde_json::from_str(
            r#"{"success":false,"payload":{"kind":"spawn_error","message":"denied"}}"#,
        )
        .unwrap();
        assert_eq!(err.error_kind(), Some(ErrorKind::SpawnError));
    }

    #[test]
    fn success_flag_selects_payload_shape() {
        let ok: ResponseEnvelope = serde_json::from_str(
            r#"{"success":true,"payload":{"kind":"spawn_error","message":"looks like an error"}}"#,
        )
        .unwrap();
        assert!(matches!(ok.payload, Payload::Data(_)));
        assert_eq!(ok.error_kind(), None);
        assert_eq!(ok.field("kind"), Some(&json!("spawn_error")));

        let bad = serde_json::from_str::<ResponseEnvelope>(
            r#"{"success":false,"payload":{"message":"no kind"}}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn with_field_merges_into_existing_details() {
        let envelope = ResponseEnvelope::failure(ErrorKind::ProcessExited, "exited")
            .with_details(json!({ "exitCode": 1 }))
            .with_field("event", "node:exited");
        assert_eq!(envelope.field("exitCode"), Some(&json!(1)));
        assert_eq!(envelope.event_name(), Some("node:exited"));
    }

    #[test]
    fn error_kind_display_matches_wire_name() {
        let wire = serde_json::to_value(ErrorKind::TerminationError).unwrap();
        assert_eq!(wire, json!(ErrorKind::TerminationError.to_string()));
    }
}
