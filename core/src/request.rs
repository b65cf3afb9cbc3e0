//! Outgoing request description, built once and read by a transport.
//!
//! # Design
//! `Request` is immutable after `Request::new`: fields are private and only
//! exposed through accessors. Headers are copied into a container the
//! request owns, so later changes to the caller's headers never reach it.
//! The body is moved in as given and interpreted lazily through `Body`.

use serde::Deserialize;
use tracing::debug;

use crate::body::{Body, Payload};
use crate::error::RequestError;
use crate::headers::{Headers, HeadersInit};
use crate::method::{normalize_method_name, MethodName, RequestMethod};
use crate::types::{ContentType, ResponseContentType};

/// Configuration value a `Request` is built from.
///
/// Every field but `url` has a default, so a JSON document such as
/// `{"url": "/ping"}` describes a plain GET with no headers or body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestOptions {
    pub url: Option<String>,
    pub method: MethodName,
    pub headers: Option<HeadersInit>,
    pub body: Option<Payload>,
    pub with_credentials: bool,
    pub response_type: ResponseContentType,
}

impl RequestOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Load options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        serde_json::from_str(json).map_err(|e| RequestError::InvalidOptions(e.to_string()))
    }

    pub fn method(mut self, method: impl Into<MethodName>) -> Self {
        self.method = method.into();
        self
    }

    pub fn headers(mut self, headers: impl Into<HeadersInit>) -> Self {
        self.headers = Some(headers.into());
        self
    }

    pub fn body(mut self, body: impl Into<Payload>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_credentials(mut self, with_credentials: bool) -> Self {
        self.with_credentials = with_credentials;
        self
    }

    pub fn response_type(mut self, response_type: ResponseContentType) -> Self {
        self.response_type = response_type;
        self
    }
}

/// An HTTP request described as plain data, ready for a transport.
#[derive(Debug, Clone)]
pub struct Request {
    url: String,
    method: RequestMethod,
    headers: Headers,
    body: Option<Payload>,
    with_credentials: bool,
    response_type: ResponseContentType,
    content_type: ContentType,
}

impl Request {
    /// Validate and normalize `options` into a request.
    ///
    /// Fails with `MissingUrl` when the url is absent or empty, and with
    /// `InvalidMethod` when the method is not GET, POST, PUT or DELETE.
    pub fn new(options: RequestOptions) -> Result<Self, RequestError> {
        let url = match options.url {
            Some(url) if !url.is_empty() => url,
            _ => return Err(RequestError::MissingUrl),
        };
        let method = normalize_method_name(options.method)?;
        let headers = Headers::from_init(options.headers.as_ref());
        let content_type = ContentType::resolve(options.body.as_ref());

        debug!(
            %url,
            %method,
            ?content_type,
            headers = headers.len(),
            "built request"
        );

        Ok(Self {
            url,
            method,
            headers,
            body: options.body,
            with_credentials: options.with_credentials,
            response_type: options.response_type,
            content_type,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn with_credentials(&self) -> bool {
        self.with_credentials
    }

    pub fn response_type(&self) -> ResponseContentType {
        self.response_type
    }

    /// How the body should be encoded, derived from its shape.
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// `Content-Type` value a transport should send when the caller set
    /// none: the blob's own type if it has one, otherwise the conventional
    /// value for `content_type()`.
    pub fn mime(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(Payload::mime)
            .or_else(|| self.content_type.mime())
    }
}

impl Body for Request {
    fn payload(&self) -> Option<&Payload> {
        self.body.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;

    #[test]
    fn minimal_options_build_a_get() {
        let req = Request::new(RequestOptions::new("http://localhost/ping")).unwrap();
        assert_eq!(req.url(), "http://localhost/ping");
        assert_eq!(req.method(), RequestMethod::Get);
        assert!(req.headers().is_empty());
        assert!(!req.with_credentials());
        assert_eq!(req.response_type(), ResponseContentType::Text);
        assert_eq!(req.content_type(), ContentType::None);
        assert_eq!(req.text(), "");
    }

    #[test]
    fn missing_url_is_rejected() {
        let err = Request::new(RequestOptions::default()).unwrap_err();
        assert_eq!(err, RequestError::MissingUrl);
    }

    #[test]
    fn empty_url_is_rejected() {
        let err = Request::new(RequestOptions::new("")).unwrap_err();
        assert_eq!(err, RequestError::MissingUrl);
    }

    #[test]
    fn unsupported_method_is_rejected_verbatim() {
        let err = Request::new(RequestOptions::new("/x").method("PATCH")).unwrap_err();
        assert_eq!(err, RequestError::InvalidMethod("PATCH".to_string()));
    }

    #[test]
    fn url_is_checked_before_method() {
        let err = Request::new(RequestOptions::new("").method("PATCH")).unwrap_err();
        assert_eq!(err, RequestError::MissingUrl);
    }

    #[test]
    fn method_names_are_normalized() {
        let req = Request::new(RequestOptions::new("/x").method("post")).unwrap();
        assert_eq!(req.method(), RequestMethod::Post);
        let req = Request::new(RequestOptions::new("/x").method(RequestMethod::Delete)).unwrap();
        assert_eq!(req.method(), RequestMethod::Delete);
    }

    #[test]
    fn headers_are_independent_of_the_caller() {
        let mut original = Headers::new();
        original.set("Accept", "application/json");

        let req = Request::new(RequestOptions::new("/x").headers(original.clone())).unwrap();
        original.append("Accept", "text/html");
        original.set("X-Late", "1");

        assert_eq!(req.headers().get_all("accept").unwrap(), ["application/json"]);
        assert!(!req.headers().has("x-late"));
    }

    #[test]
    fn headers_from_plain_mapping() {
        let init: HeadersInit = [("X-Token", "abc"), ("x-token", "def")].into_iter().collect();
        let req = Request::new(RequestOptions::new("/x").headers(init)).unwrap();
        assert_eq!(req.headers().get("X-TOKEN"), Some("def"));
        assert_eq!(req.headers().keys(), vec!["x-token"]);
    }

    #[test]
    fn body_classification_and_reading() {
        let req = Request::new(
            RequestOptions::new("/x")
                .method("PUT")
                .body(json!({"title": "Buy milk"})),
        )
        .unwrap();
        assert_eq!(req.content_type(), ContentType::Json);
        assert_eq!(req.json::<serde_json::Value>().unwrap()["title"], "Buy milk");
        assert_eq!(req.text(), r#"{"title":"Buy milk"}"#);

        let req = Request::new(RequestOptions::new("/x").method("POST").body("[1,2")).unwrap();
        assert_eq!(req.content_type(), ContentType::Text);
        assert!(matches!(
            req.json::<serde_json::Value>(),
            Err(RequestError::MalformedPayload(_))
        ));
    }

    #[test]
    fn json_string_body_is_text() {
        let req = Request::new(RequestOptions::new("/x").method("POST").body(json!("{oops"))).unwrap();
        assert_eq!(req.content_type(), ContentType::Text);
        assert_eq!(req.text(), "{oops");
        assert!(matches!(
            req.json::<serde_json::Value>(),
            Err(RequestError::MalformedPayload(_))
        ));
    }

    #[test]
    fn mime_prefers_the_blob_type() {
        let blob = |mime: Option<&str>| Payload::Blob {
            data: vec![1, 2, 3],
            mime: mime.map(str::to_string),
        };

        let req = Request::new(RequestOptions::new("/x").method("PUT").body(blob(Some("image/png")))).unwrap();
        assert_eq!(req.content_type(), ContentType::Blob);
        assert_eq!(req.mime(), Some("image/png"));

        let req = Request::new(RequestOptions::new("/x").method("PUT").body(blob(None))).unwrap();
        assert_eq!(req.mime(), Some("application/octet-stream"));

        let req = Request::new(RequestOptions::new("/x").body("hi")).unwrap();
        assert_eq!(req.mime(), Some("text/plain;charset=UTF-8"));

        let req = Request::new(RequestOptions::new("/x")).unwrap();
        assert_eq!(req.mime(), None);
    }

    #[test]
    fn flags_are_copied_through() {
        let req = Request::new(
            RequestOptions::new("/x")
                .with_credentials(true)
                .response_type(ResponseContentType::Blob),
        )
        .unwrap();
        assert!(req.with_credentials());
        assert_eq!(req.response_type(), ResponseContentType::Blob);
    }

    #[test]
    fn options_load_from_json() {
        let options = RequestOptions::from_json(
            r#"{
                "url": "https://example.com/notes",
                "method": "post",
                "headers": {"Content-Type": "application/json", "Accept": ["a", "b"]},
                "body": {"title": "x"},
                "withCredentials": true,
                "responseType": "json"
            }"#,
        )
        .unwrap();
        let req = Request::new(options).unwrap();

        assert_eq!(req.method(), RequestMethod::Post);
        assert_eq!(req.headers().keys(), vec!["Content-Type", "Accept"]);
        assert_eq!(req.headers().get_all("accept").unwrap(), ["a", "b"]);
        assert!(req.with_credentials());
        assert_eq!(req.response_type(), ResponseContentType::Json);
        assert_eq!(req.content_type(), ContentType::Json);
    }

    #[test]
    fn malformed_options_json_is_reported() {
        let err = RequestOptions::from_json(r#"{"url": 3}"#).unwrap_err();
        assert!(matches!(err, RequestError::InvalidOptions(_)));
    }

    #[traced_test]
    #[test]
    fn building_a_request_is_logged() {
        Request::new(RequestOptions::new("/logged").method("DELETE")).unwrap();
        assert!(logs_contain("built request"));
        assert!(logs_contain("DELETE"));
    }
}
