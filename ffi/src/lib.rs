//! C-ABI wrapper around `rxhr-core`.
//!
//! # Overview
//! Lets a transport written in any language with a C FFI build header
//! containers and request descriptions, read them back field by field, and
//! parse raw response header blocks, without linking to serde directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Requests are configured with the same JSON document `RequestOptions`
//!   accepts, so the C surface stays small.
//! - The C caller owns all returned pointers and must call the matching
//!   `rxhr_*_free` function to release them. Every free function accepts null.

pub mod types;

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use rxhr_core::{Body, Headers, Request, RequestOptions};

use types::*;

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// Create an empty header container.
///
/// The caller must free the returned pointer with `rxhr_headers_free`.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_headers_new() -> *mut FfiHeaders {
    catch_unwind(|| FfiHeaders::into_raw(Headers::new())).unwrap_or(std::ptr::null_mut())
}

/// Parse a raw response header block (`Name: value` lines) into a container.
///
/// Returns null if `text` is null or not valid UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_headers_from_response_string(text: *const c_char) -> *mut FfiHeaders {
    catch_unwind(|| match unsafe { read_str(text) } {
        Ok(text) => FfiHeaders::into_raw(Headers::from_response_header_string(text)),
        Err(_) => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a container returned by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_headers_free(headers: *mut FfiHeaders) {
    if !headers.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(headers) });
        });
    }
}

/// Replace the values stored under `name` with `value`.
///
/// Returns false if any argument is null or not valid UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_headers_set(
    headers: *mut FfiHeaders,
    name: *const c_char,
    value: *const c_char,
) -> bool {
    catch_unwind(move || {
        if headers.is_null() {
            return false;
        }
        let (Ok(name), Ok(value)) = (unsafe { read_str(name) }, unsafe { read_str(value) }) else {
            return false;
        };
        let headers = unsafe { &mut *headers };
        headers.inner.set(name, value);
        true
    })
    .unwrap_or(false)
}

/// Add `value` under `name`, keeping values already stored.
///
/// Returns false if any argument is null or not valid UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_headers_append(
    headers: *mut FfiHeaders,
    name: *const c_char,
    value: *const c_char,
) -> bool {
    catch_unwind(move || {
        if headers.is_null() {
            return false;
        }
        let (Ok(name), Ok(value)) = (unsafe { read_str(name) }, unsafe { read_str(value) }) else {
            return false;
        };
        let headers = unsafe { &mut *headers };
        headers.inner.append(name, value);
        true
    })
    .unwrap_or(false)
}

/// Remove every value stored under `name`.
///
/// Returns false if any argument is null or not valid UTF-8. Deleting a
/// missing header is not an error.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_headers_delete(headers: *mut FfiHeaders, name: *const c_char) -> bool {
    catch_unwind(move || {
        if headers.is_null() {
            return false;
        }
        let Ok(name) = (unsafe { read_str(name) }) else {
            return false;
        };
        let headers = unsafe { &mut *headers };
        headers.inner.delete(name);
        true
    })
    .unwrap_or(false)
}

/// Whether a header is stored under `name`, compared case-insensitively.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_headers_has(headers: *const FfiHeaders, name: *const c_char) -> bool {
    catch_unwind(|| {
        if headers.is_null() {
            return false;
        }
        let Ok(name) = (unsafe { read_str(name) }) else {
            return false;
        };
        let headers = unsafe { &*headers };
        headers.inner.has(name)
    })
    .unwrap_or(false)
}

/// First value stored under `name`.
///
/// Returns null if the header is absent or an argument is invalid. The
/// caller must free a non-null result with `rxhr_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_headers_get(headers: *const FfiHeaders, name: *const c_char) -> *mut c_char {
    catch_unwind(|| {
        if headers.is_null() {
            return std::ptr::null_mut();
        }
        let Ok(name) = (unsafe { read_str(name) }) else {
            return std::ptr::null_mut();
        };
        let headers = unsafe { &*headers };
        headers
            .inner
            .get(name)
            .map_or(std::ptr::null_mut(), into_c_string)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Serialize the container as a JSON object of display name to values.
///
/// Returns null if `headers` is null. Free with `rxhr_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_headers_to_json(headers: *const FfiHeaders) -> *mut c_char {
    catch_unwind(|| {
        if headers.is_null() {
            return std::ptr::null_mut();
        }
        let headers = unsafe { &*headers };
        match serde_json::to_string(&headers.inner) {
            Ok(json) => into_c_string(&json),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Build a request from a JSON configuration document, e.g.
/// `{"url": "/notes", "method": "post", "headers": {...}, "body": {...}}`.
///
/// Always returns an envelope; free it with `rxhr_request_result_free`.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_request_new(options_json: *const c_char) -> *mut FfiRequestResult {
    catch_unwind(|| {
        let json = match unsafe { read_str(options_json) } {
            Ok(json) => json,
            Err(code) => return FfiRequestResult::err(code, "options_json must be a UTF-8 string"),
        };
        match RequestOptions::from_json(json).and_then(Request::new) {
            Ok(request) => FfiRequestResult::ok(request),
            Err(e) => FfiRequestResult::from_error(&e),
        }
    })
    .unwrap_or_else(|_| FfiRequestResult::err(FfiErrorCode::Panic, "panic in rxhr_request_new"))
}

/// The request url. Returns null if `request` is null. Free with
/// `rxhr_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_request_url(request: *const FfiRequest) -> *mut c_char {
    catch_unwind(|| {
        if request.is_null() {
            return std::ptr::null_mut();
        }
        let request = unsafe { &*request };
        into_c_string(request.inner.url())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Write the request method to `out`. Returns false if either pointer is null.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_request_method(
    request: *const FfiRequest,
    out: *mut FfiRequestMethod,
) -> bool {
    catch_unwind(|| {
        if request.is_null() || out.is_null() {
            return false;
        }
        let request = unsafe { &*request };
        unsafe { out.write(request.inner.method().into()) };
        true
    })
    .unwrap_or(false)
}

/// Write the body classification to `out`. Returns false if either pointer
/// is null.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_request_content_type(
    request: *const FfiRequest,
    out: *mut FfiContentType,
) -> bool {
    catch_unwind(|| {
        if request.is_null() || out.is_null() {
            return false;
        }
        let request = unsafe { &*request };
        unsafe { out.write(request.inner.content_type().into()) };
        true
    })
    .unwrap_or(false)
}

/// Write the expected response interpretation to `out`. Returns false if
/// either pointer is null.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_request_response_type(
    request: *const FfiRequest,
    out: *mut FfiResponseContentType,
) -> bool {
    catch_unwind(|| {
        if request.is_null() || out.is_null() {
            return false;
        }
        let request = unsafe { &*request };
        unsafe { out.write(request.inner.response_type().into()) };
        true
    })
    .unwrap_or(false)
}

/// `Content-Type` value to send when the headers carry none. Returns null
/// for a request without a body or a null `request`. Free with
/// `rxhr_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_request_mime(request: *const FfiRequest) -> *mut c_char {
    catch_unwind(|| {
        if request.is_null() {
            return std::ptr::null_mut();
        }
        let request = unsafe { &*request };
        request.inner.mime().map_or(std::ptr::null_mut(), into_c_string)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Whether credentials should accompany the request. False for null.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_request_with_credentials(request: *const FfiRequest) -> bool {
    catch_unwind(|| {
        if request.is_null() {
            return false;
        }
        let request = unsafe { &*request };
        request.inner.with_credentials()
    })
    .unwrap_or(false)
}

/// A copy of the request headers. Changes to the copy do not affect the
/// request. Returns null if `request` is null; free with `rxhr_headers_free`.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_request_headers(request: *const FfiRequest) -> *mut FfiHeaders {
    catch_unwind(|| {
        if request.is_null() {
            return std::ptr::null_mut();
        }
        let request = unsafe { &*request };
        FfiHeaders::into_raw(Headers::from_headers(request.inner.headers()))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// The body as text (empty when there is no body). Returns null if
/// `request` is null. Free with `rxhr_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_request_body_text(request: *const FfiRequest) -> *mut c_char {
    catch_unwind(|| {
        if request.is_null() {
            return std::ptr::null_mut();
        }
        let request = unsafe { &*request };
        into_c_string(&request.inner.text())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// The body interpreted as structured data, re-serialized as compact JSON.
///
/// Fails with `MalformedPayload` when a text body is not valid JSON. Free
/// the envelope with `rxhr_string_result_free`.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_request_body_json(request: *const FfiRequest) -> *mut FfiStringResult {
    catch_unwind(|| {
        if request.is_null() {
            return FfiStringResult::err(FfiErrorCode::NullArg, "null argument: request");
        }
        let request = unsafe { &*request };
        match request.inner.json::<serde_json::Value>() {
            Ok(value) => FfiStringResult::ok(&value.to_string()),
            Err(e) => FfiStringResult::from_error(&e),
        }
    })
    .unwrap_or_else(|_| FfiStringResult::err(FfiErrorCode::Panic, "panic in rxhr_request_body_json"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request handle. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_request_free(request: *mut FfiRequest) {
    if !request.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(request) });
        });
    }
}

/// Free an envelope returned by `rxhr_request_new` and its error message.
/// The request handle, if any, stays valid. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_request_result_free(result: *mut FfiRequestResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
    });
}

/// Free an `FfiStringResult` and the strings it carries. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_string_result_free(result: *mut FfiStringResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.value.is_null() {
            drop(unsafe { CString::from_raw(result.value) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn rxhr_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{CStr, CString};

    /// Copy and free a string returned by the library.
    fn take_string(ptr: *mut c_char) -> Option<String> {
        if ptr.is_null() {
            return None;
        }
        let s = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        rxhr_free_string(ptr);
        Some(s)
    }

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    fn new_request(json: &str) -> *mut FfiRequestResult {
        let json = c(json);
        rxhr_request_new(json.as_ptr())
    }

    #[test]
    fn headers_new_and_free() {
        let headers = rxhr_headers_new();
        assert!(!headers.is_null());
        rxhr_headers_free(headers);
    }

    #[test]
    fn headers_free_null_is_safe() {
        rxhr_headers_free(std::ptr::null_mut());
    }

    #[test]
    fn headers_set_append_get() {
        let headers = rxhr_headers_new();
        let name = c("Accept");
        assert!(rxhr_headers_append(headers, name.as_ptr(), c("a").as_ptr()));
        assert!(rxhr_headers_append(headers, c("accept").as_ptr(), c("b").as_ptr()));

        assert_eq!(take_string(rxhr_headers_get(headers, c("ACCEPT").as_ptr())), Some("a".to_string()));
        assert_eq!(
            take_string(rxhr_headers_to_json(headers)),
            Some(r#"{"Accept":["a","b"]}"#.to_string())
        );

        assert!(rxhr_headers_set(headers, c("accept").as_ptr(), c("c").as_ptr()));
        assert_eq!(
            take_string(rxhr_headers_to_json(headers)),
            Some(r#"{"Accept":["c"]}"#.to_string())
        );
        rxhr_headers_free(headers);
    }

    #[test]
    fn headers_has_and_delete() {
        let headers = rxhr_headers_new();
        assert!(rxhr_headers_set(headers, c("X-Foo").as_ptr(), c("1").as_ptr()));
        assert!(rxhr_headers_has(headers, c("x-foo").as_ptr()));

        assert!(rxhr_headers_delete(headers, c("X-FOO").as_ptr()));
        assert!(!rxhr_headers_has(headers, c("x-foo").as_ptr()));
        assert!(rxhr_headers_get(headers, c("x-foo").as_ptr()).is_null());
        rxhr_headers_free(headers);
    }

    #[test]
    fn headers_null_arguments_are_rejected() {
        let headers = rxhr_headers_new();
        assert!(!rxhr_headers_set(headers, std::ptr::null(), c("v").as_ptr()));
        assert!(!rxhr_headers_append(std::ptr::null_mut(), c("n").as_ptr(), c("v").as_ptr()));
        assert!(!rxhr_headers_delete(headers, std::ptr::null()));
        assert!(!rxhr_headers_has(std::ptr::null(), c("n").as_ptr()));
        assert!(rxhr_headers_get(headers, std::ptr::null()).is_null());
        assert!(rxhr_headers_to_json(std::ptr::null()).is_null());
        rxhr_headers_free(headers);
    }

    #[test]
    fn headers_from_response_string() {
        let text = c("Content-Length:343\nnot a header\nServer: Apache\r\n");
        let headers = rxhr_headers_from_response_string(text.as_ptr());
        assert!(!headers.is_null());
        assert_eq!(
            take_string(rxhr_headers_get(headers, c("content-length").as_ptr())),
            Some("343".to_string())
        );
        assert_eq!(
            take_string(rxhr_headers_get(headers, c("server").as_ptr())),
            Some("Apache".to_string())
        );
        rxhr_headers_free(headers);

        assert!(rxhr_headers_from_response_string(std::ptr::null()).is_null());
    }

    #[test]
    fn request_new_exposes_fields() {
        let result = new_request(
            r#"{"url":"http://localhost/notes","method":"post","headers":{"X-A":"1"},"body":{"title":"x"},"withCredentials":true}"#,
        );
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Ok);
        assert!(result_ref.error_message.is_null());
        let request = result_ref.request;
        assert!(!request.is_null());
        rxhr_request_result_free(result);

        assert_eq!(
            take_string(rxhr_request_url(request)),
            Some("http://localhost/notes".to_string())
        );

        let mut method = FfiRequestMethod::Get;
        assert!(rxhr_request_method(request, &mut method));
        assert_eq!(method, FfiRequestMethod::Post);

        let mut content_type = FfiContentType::None;
        assert!(rxhr_request_content_type(request, &mut content_type));
        assert_eq!(content_type, FfiContentType::Json);

        assert!(rxhr_request_with_credentials(request));
        assert_eq!(take_string(rxhr_request_body_text(request)), Some(r#"{"title":"x"}"#.to_string()));

        let json = rxhr_request_body_json(request);
        let json_ref = unsafe { &*json };
        assert_eq!(json_ref.error_code, FfiErrorCode::Ok);
        let value = unsafe { CStr::from_ptr(json_ref.value) }.to_str().unwrap();
        assert_eq!(value, r#"{"title":"x"}"#);
        rxhr_string_result_free(json);

        rxhr_request_free(request);
    }

    #[test]
    fn request_response_type() {
        let result = new_request(r#"{"url":"/x","responseType":"json"}"#);
        let request = unsafe { &*result }.request;
        rxhr_request_result_free(result);

        let mut response_type = FfiResponseContentType::Text;
        assert!(rxhr_request_response_type(request, &mut response_type));
        assert_eq!(response_type, FfiResponseContentType::Json);
        assert!(!rxhr_request_response_type(request, std::ptr::null_mut()));
        assert!(!rxhr_request_response_type(std::ptr::null(), &mut response_type));
        rxhr_request_free(request);

        let result = new_request(r#"{"url":"/x"}"#);
        let request = unsafe { &*result }.request;
        rxhr_request_result_free(result);
        assert!(rxhr_request_response_type(request, &mut response_type));
        assert_eq!(response_type, FfiResponseContentType::Text);
        rxhr_request_free(request);
    }

    #[test]
    fn request_mime() {
        let result = new_request(r#"{"url":"/x","method":"post","body":{"a":1}}"#);
        let request = unsafe { &*result }.request;
        rxhr_request_result_free(result);
        assert_eq!(take_string(rxhr_request_mime(request)), Some("application/json".to_string()));
        rxhr_request_free(request);

        let result = new_request(r#"{"url":"/x"}"#);
        let request = unsafe { &*result }.request;
        rxhr_request_result_free(result);
        assert!(rxhr_request_mime(request).is_null());
        rxhr_request_free(request);

        assert!(rxhr_request_mime(std::ptr::null()).is_null());
    }

    #[test]
    fn request_headers_are_a_copy() {
        let result = new_request(r#"{"url":"/x","headers":{"X-A":"1"}}"#);
        let request = unsafe { &*result }.request;
        rxhr_request_result_free(result);

        let copy = rxhr_request_headers(request);
        assert!(rxhr_headers_set(copy, c("X-A").as_ptr(), c("2").as_ptr()));

        let again = rxhr_request_headers(request);
        assert_eq!(
            take_string(rxhr_headers_get(again, c("x-a").as_ptr())),
            Some("1".to_string())
        );

        rxhr_headers_free(copy);
        rxhr_headers_free(again);
        rxhr_request_free(request);
    }

    #[test]
    fn request_new_missing_url() {
        let result = new_request(r#"{"method":"GET"}"#);
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::MissingUrl);
        assert!(result_ref.request.is_null());
        assert!(!result_ref.error_message.is_null());
        rxhr_request_result_free(result);
    }

    #[test]
    fn request_new_invalid_method_mentions_input() {
        let result = new_request(r#"{"url":"/x","method":"PATCH"}"#);
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::InvalidMethod);
        let msg = unsafe { CStr::from_ptr(result_ref.error_message) }.to_str().unwrap();
        assert!(msg.contains("\"PATCH\""), "{msg}");
        rxhr_request_result_free(result);
    }

    #[test]
    fn request_new_invalid_json() {
        let result = new_request("{not json");
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::InvalidOptions);
        rxhr_request_result_free(result);
    }

    #[test]
    fn request_new_null_options() {
        let result = rxhr_request_new(std::ptr::null());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        rxhr_request_result_free(result);
    }

    #[test]
    fn request_body_json_malformed_text() {
        let result = new_request(r#"{"url":"/x","method":"PUT","body":"{oops"}"#);
        let request = unsafe { &*result }.request;
        rxhr_request_result_free(result);

        let json = rxhr_request_body_json(request);
        let json_ref = unsafe { &*json };
        assert_eq!(json_ref.error_code, FfiErrorCode::MalformedPayload);
        assert!(json_ref.value.is_null());
        rxhr_string_result_free(json);
        rxhr_request_free(request);
    }

    #[test]
    fn request_accessors_handle_null() {
        let mut method = FfiRequestMethod::Get;
        assert!(!rxhr_request_method(std::ptr::null(), &mut method));
        assert!(rxhr_request_url(std::ptr::null()).is_null());
        assert!(rxhr_request_headers(std::ptr::null()).is_null());
        assert!(rxhr_request_body_text(std::ptr::null()).is_null());
        assert!(!rxhr_request_with_credentials(std::ptr::null()));

        let json = rxhr_request_body_json(std::ptr::null());
        assert_eq!(unsafe { &*json }.error_code, FfiErrorCode::NullArg);
        rxhr_string_result_free(json);
    }

    #[test]
    fn free_functions_accept_null() {
        rxhr_request_free(std::ptr::null_mut());
        rxhr_request_result_free(std::ptr::null_mut());
        rxhr_string_result_free(std::ptr::null_mut());
        rxhr_free_string(std::ptr::null_mut());
    }
}
