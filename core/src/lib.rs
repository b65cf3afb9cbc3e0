//! Request-description core for XHR-style HTTP clients.
//!
//! # Overview
//! Describes an outgoing HTTP request (method, url, headers, body) as plain
//! data without touching the network (host-does-IO pattern). A transport
//! reads the finished `Request` and performs the round-trip, then may hand
//! the raw response header block back to `Headers::from_response_header_string`.
//!
//! # Design
//! - `Headers` is a case-insensitive ordered multi-map that remembers the
//!   first casing seen for each name.
//! - `Request` is built once from `RequestOptions` and is read-only after.
//! - `Body` is a capability trait; `Request` implements it by exposing its
//!   payload.

pub mod body;
pub mod error;
pub mod headers;
pub mod method;
pub mod request;
pub mod types;

pub use body::{Body, Payload};
pub use error::RequestError;
pub use headers::{HeaderValue, Headers, HeadersInit};
pub use method::{normalize_method_name, MethodName, RequestMethod};
pub use request::{Request, RequestOptions};
pub use types::{ContentType, ResponseContentType};
