//! Body and response classifications shared with transports.
//!
//! # Design
//! `ContentType` says how an outgoing body should be encoded;
//! `ResponseContentType` says how the transport should hand back the
//! response payload. Neither is interpreted by this crate beyond
//! classification, the encoding itself is the transport's job.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::body::Payload;

/// How a request body should be serialized for transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    None,
    Json,
    Form,
    FormData,
    Text,
    Blob,
    ArrayBuffer,
}

impl ContentType {
    /// Classify a body by its shape. An absent body is `None` and a JSON
    /// string is `Text`; every other payload maps onto the variant of the
    /// same name.
    pub fn resolve(payload: Option<&Payload>) -> ContentType {
        match payload {
            None => ContentType::None,
            Some(Payload::Text(_)) | Some(Payload::Json(Value::String(_))) => ContentType::Text,
            Some(Payload::Json(_)) => ContentType::Json,
            Some(Payload::Form(_)) => ContentType::Form,
            Some(Payload::FormData(_)) => ContentType::FormData,
            Some(Payload::Blob { .. }) => ContentType::Blob,
            Some(Payload::ArrayBuffer(_)) => ContentType::ArrayBuffer,
        }
    }

    /// Conventional `Content-Type` header value for this classification.
    /// `Request::mime` prefers a type carried by the payload itself.
    ///
    /// Multipart bodies need a boundary parameter, which the transport
    /// appends when it encodes the parts.
    pub fn mime(self) -> Option<&'static str> {
        match self {
            ContentType::None => None,
            ContentType::Json => Some("application/json"),
            ContentType::Form => Some("application/x-www-form-urlencoded"),
            ContentType::FormData => Some("multipart/form-data"),
            ContentType::Text => Some("text/plain;charset=UTF-8"),
            ContentType::Blob | ContentType::ArrayBuffer => Some("application/octet-stream"),
        }
    }
}

/// How a transport should interpret the eventual response payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseContentType {
    #[default]
    Text,
    Json,
    ArrayBuffer,
    Blob,
}
