//! Error types for request construction and body interpretation.
//!
//! # Design
//! Every failure is synchronous and local to the operation that raised it.
//! Header operations never fail; only building a `Request`, normalizing a
//! method name and reading a body as structured data can.

use thiserror::Error;

/// Errors returned while building or reading a `Request`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The configuration carried no url, or an empty one.
    #[error("request must have a url")]
    MissingUrl,

    /// The method name is not one of GET, POST, PUT or DELETE. Holds the
    /// caller's input exactly as given.
    #[error("invalid request method: {0:?} is not supported")]
    InvalidMethod(String),

    /// The body could not be interpreted as structured data.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The configuration value itself could not be deserialized.
    #[error("invalid request options: {0}")]
    InvalidOptions(String),
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        RequestError::MalformedPayload(err.to_string())
    }
}
