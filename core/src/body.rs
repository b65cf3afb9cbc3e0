//! Request and response payloads, and the `Body` capability for reading them.
//!
//! # Design
//! `Body` is a trait with provided methods rather than a base type: anything
//! that carries a payload implements `payload()` and gets `json()` and
//! `text()` for free. Payloads are stored as given and only interpreted
//! when read.

use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::error::RequestError;

/// A body as supplied by the caller, in one of the shapes a transport knows
/// how to encode.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(Value),
    /// Fields sent as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
    /// Fields sent as `multipart/form-data`.
    FormData(Vec<(String, String)>),
    Blob {
        data: Vec<u8>,
        mime: Option<String>,
    },
    ArrayBuffer(Vec<u8>),
}

impl Payload {
    /// Structural view of the payload. Text stays a JSON string, form fields
    /// become an object (a repeated field keeps its last value) and binary
    /// data becomes an array of byte values.
    pub fn to_value(&self) -> Value {
        match self {
            Payload::Text(text) => Value::String(text.clone()),
            Payload::Json(value) => value.clone(),
            Payload::Form(fields) | Payload::FormData(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                    .collect(),
            ),
            Payload::Blob { data, .. } | Payload::ArrayBuffer(data) => {
                Value::Array(data.iter().map(|byte| Value::from(*byte)).collect())
            }
        }
    }

    /// Text carried by the payload, whether given as `Text` or as a JSON
    /// string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) | Payload::Json(Value::String(text)) => Some(text),
            _ => None,
        }
    }

    /// Type declared by the payload itself. Only blobs carry one.
    pub fn mime(&self) -> Option<&str> {
        match self {
            Payload::Blob { mime, .. } => mime.as_deref(),
            _ => None,
        }
    }

    /// True for payloads that read back as an empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Text(text) => text.is_empty(),
            Payload::Json(Value::Null) | Payload::Json(Value::Bool(false)) => true,
            Payload::Json(Value::String(text)) => text.is_empty(),
            Payload::Json(Value::Number(n)) => n.as_f64() == Some(0.0),
            Payload::Json(_) => false,
            Payload::Form(fields) | Payload::FormData(fields) => fields.is_empty(),
            Payload::Blob { data, .. } | Payload::ArrayBuffer(data) => data.is_empty(),
        }
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Payload::Text(text),
            other => Payload::Json(other),
        }
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Payload::from)
    }
}

/// Read access to a payload, shared by every type that carries one.
pub trait Body {
    fn payload(&self) -> Option<&Payload>;

    /// Interpret the payload as structured data.
    ///
    /// Text, including a JSON string, is parsed as JSON and fails with
    /// `MalformedPayload` when it does not parse into `T`. Other payloads are converted through
    /// `Payload::to_value`. An absent body reads as JSON `null`.
    fn json<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        let parsed = match self.payload() {
            Some(payload) => match payload.as_text() {
                Some(text) => serde_json::from_str(text),
                None => serde_json::from_value(payload.to_value()),
            },
            None => serde_json::from_value(Value::Null),
        };
        parsed.map_err(|err| {
            debug!(error = %err, "body is not valid structured data");
            RequestError::from(err)
        })
    }

    /// Interpret the payload as text. Absent or empty payloads read as `""`.
    fn text(&self) -> String {
        let payload = match self.payload() {
            Some(payload) if !payload.is_empty() => payload,
            _ => return String::new(),
        };
        match payload {
            Payload::Text(text) | Payload::Json(Value::String(text)) => text.clone(),
            Payload::Json(value) => value.to_string(),
            Payload::Form(fields) | Payload::FormData(fields) => {
                form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(fields.iter())
                    .finish()
            }
            Payload::Blob { data, .. } | Payload::ArrayBuffer(data) => {
                String::from_utf8_lossy(data).into_owned()
            }
        }
    }
}
