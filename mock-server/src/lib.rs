//! Echo server standing in for the remote end of a transport.
//!
//! `/echo` accepts any method and reflects what it received: the method,
//! every request header as a `(name, value)` pair, and the body as text.
//! It also sets `x-echo-method` and `x-echo-body-length` on the response so
//! clients can exercise response header parsing.

use axum::{
    http::{HeaderMap, Method},
    response::IntoResponse,
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Echo {
    /// Every value received for `name`, compared case-insensitively.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

pub fn app() -> Router {
    Router::new().route("/echo", any(echo))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, headers: HeaderMap, body: String) -> impl IntoResponse {
    info!(%method, headers = headers.len(), body_len = body.len(), "echo");

    let echo = Echo {
        method: method.as_str().to_string(),
        headers: headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect(),
        body,
    };
    let response_headers = [
        ("x-echo-method", echo.method.clone()),
        ("x-echo-body-length", echo.body.len().to_string()),
    ];
    (response_headers, Json(echo))
}
