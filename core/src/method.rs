//! Request methods and method-name normalization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// HTTP method of an outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    /// Every supported method, in declaration order.
    pub const ALL: [RequestMethod; 4] = [
        RequestMethod::Get,
        RequestMethod::Post,
        RequestMethod::Put,
        RequestMethod::Delete,
    ];

    /// Canonical upper-case name, as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestMethod {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_method_name(s)
    }
}

/// A method as supplied by a caller: either already resolved or still a
/// textual name awaiting normalization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum MethodName {
    Method(RequestMethod),
    Name(String),
}

impl Default for MethodName {
    fn default() -> Self {
        MethodName::Method(RequestMethod::Get)
    }
}

impl From<RequestMethod> for MethodName {
    fn from(method: RequestMethod) -> Self {
        MethodName::Method(method)
    }
}

impl From<String> for MethodName {
    fn from(name: String) -> Self {
        MethodName::Name(name)
    }
}

impl From<&str> for MethodName {
    fn from(name: &str) -> Self {
        MethodName::Name(name.to_string())
    }
}

/// Resolve a method name to a `RequestMethod`.
///
/// Already-resolved methods pass through unchanged. Names are matched
/// case-insensitively; anything outside GET, POST, PUT and DELETE fails with
/// `RequestError::InvalidMethod` carrying the name as the caller wrote it.
pub fn normalize_method_name(method: impl Into<MethodName>) -> Result<RequestMethod, RequestError> {
    match method.into() {
        MethodName::Method(method) => Ok(method),
        MethodName::Name(name) => {
            let upper = name.to_uppercase();
            RequestMethod::ALL
                .into_iter()
                .find(|m| m.as_str() == upper)
                .ok_or(RequestError::InvalidMethod(name))
        }
    }
}
