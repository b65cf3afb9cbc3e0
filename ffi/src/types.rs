//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! `Headers` and `Request` stay opaque behind boxed handles; C only sees
//! pointers to them. Enums get explicit discriminants, and fallible calls
//! return a result envelope carrying an error code and message. Conversion
//! helpers live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use rxhr_core::{
    ContentType, Headers, Request, RequestError, RequestMethod, ResponseContentType,
};

/// Opaque handle to a header container.
pub struct FfiHeaders {
    pub(crate) inner: Headers,
}

impl FfiHeaders {
    pub(crate) fn into_raw(inner: Headers) -> *mut Self {
        Box::into_raw(Box::new(FfiHeaders { inner }))
    }
}

/// Opaque handle to a built request.
pub struct FfiRequest {
    pub(crate) inner: Request,
}

/// Request method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiRequestMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<RequestMethod> for FfiRequestMethod {
    fn from(m: RequestMethod) -> Self {
        match m {
            RequestMethod::Get => FfiRequestMethod::Get,
            RequestMethod::Post => FfiRequestMethod::Post,
            RequestMethod::Put => FfiRequestMethod::Put,
            RequestMethod::Delete => FfiRequestMethod::Delete,
        }
    }
}

/// Body classification as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiContentType {
    None = 0,
    Json = 1,
    Form = 2,
    FormData = 3,
    Text = 4,
    Blob = 5,
    ArrayBuffer = 6,
}

impl From<ContentType> for FfiContentType {
    fn from(c: ContentType) -> Self {
        match c {
            ContentType::None => FfiContentType::None,
            ContentType::Json => FfiContentType::Json,
            ContentType::Form => FfiContentType::Form,
            ContentType::FormData => FfiContentType::FormData,
            ContentType::Text => FfiContentType::Text,
            ContentType::Blob => FfiContentType::Blob,
            ContentType::ArrayBuffer => FfiContentType::ArrayBuffer,
        }
    }
}

/// How the transport should hand back the response payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiResponseContentType {
    Text = 0,
    Json = 1,
    ArrayBuffer = 2,
    Blob = 3,
}

impl From<ResponseContentType> for FfiResponseContentType {
    fn from(r: ResponseContentType) -> Self {
        match r {
            ResponseContentType::Text => FfiResponseContentType::Text,
            ResponseContentType::Json => FfiResponseContentType::Json,
            ResponseContentType::ArrayBuffer => FfiResponseContentType::ArrayBuffer,
            ResponseContentType::Blob => FfiResponseContentType::Blob,
        }
    }
}

/// Error codes carried by result envelopes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    MissingUrl = 1,
    InvalidMethod = 2,
    MalformedPayload = 3,
    InvalidOptions = 4,
    Panic = 5,
    NullArg = 6,
    InvalidUtf8 = 7,
}

impl From<&RequestError> for FfiErrorCode {
    fn from(err: &RequestError) -> Self {
        match err {
            RequestError::MissingUrl => FfiErrorCode::MissingUrl,
            RequestError::InvalidMethod(_) => FfiErrorCode::InvalidMethod,
            RequestError::MalformedPayload(_) => FfiErrorCode::MalformedPayload,
            RequestError::InvalidOptions(_) => FfiErrorCode::InvalidOptions,
        }
    }
}

/// Result of `rxhr_request_new`.
///
/// On success `error_code` is `Ok`, `error_message` is null and `request`
/// points to a handle the caller releases with `rxhr_request_free`.
/// On failure `request` is null and `error_message` describes the problem.
/// `rxhr_request_result_free` releases the envelope and its message, never
/// the request.
#[repr(C)]
pub struct FfiRequestResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub request: *mut FfiRequest,
}

impl FfiRequestResult {
    pub(crate) fn ok(request: Request) -> *mut Self {
        let handle = Box::into_raw(Box::new(FfiRequest { inner: request }));
        Box::into_raw(Box::new(FfiRequestResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            request: handle,
        }))
    }

    pub(crate) fn err(error_code: FfiErrorCode, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiRequestResult {
            error_code,
            error_message: into_c_string(msg),
            request: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn from_error(err: &RequestError) -> *mut Self {
        Self::err(err.into(), &err.to_string())
    }
}

/// Result envelope for calls that produce a string or fail.
#[repr(C)]
pub struct FfiStringResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub value: *mut c_char,
}

impl FfiStringResult {
    pub(crate) fn ok(value: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiStringResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            value: into_c_string(value),
        }))
    }

    pub(crate) fn err(error_code: FfiErrorCode, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiStringResult {
            error_code,
            error_message: into_c_string(msg),
            value: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn from_error(err: &RequestError) -> *mut Self {
        Self::err(err.into(), &err.to_string())
    }
}

/// Copy `s` into a heap C string owned by the caller. Interior NUL bytes
/// cannot be represented and are dropped.
pub(crate) fn into_c_string(s: &str) -> *mut c_char {
    let bytes: Vec<u8> = s.bytes().filter(|b| *b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}

/// Borrow a caller-owned C string as UTF-8.
///
/// Returns `Err(NullArg)` for null and `Err(InvalidUtf8)` for invalid text.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
pub(crate) unsafe fn read_str<'a>(ptr: *const c_char) -> Result<&'a str, FfiErrorCode> {
    if ptr.is_null() {
        return Err(FfiErrorCode::NullArg);
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| FfiErrorCode::InvalidUtf8)
}
