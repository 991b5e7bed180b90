//! HTTP-level error responses.
//!
//! An [`HttpError`] carries its own status code and renders as a small JSON
//! document, so it can be returned from a handler (`Result<T, HttpError>`) or
//! handed to the dispatcher by an authenticator as a ready-made denial body.

use http::{HeaderValue, StatusCode, header};

use crate::{body::VigilBody, responder::Responder, types::Response};

/// An error that maps directly onto an HTTP response.
///
/// # Examples
///
/// ```rust
/// use http::StatusCode;
/// use vigil::error::HttpError;
///
/// let err = HttpError::new(StatusCode::FORBIDDEN, "account locked");
/// assert_eq!(err.to_json().to_string(), r#"{"httpcode":403,"message":"account locked"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status}: {message}")]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    /// An error answered with `status` and `message`.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// `405 Method Not Allowed`, used by the router for unregistered methods.
    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
    }

    /// `500 Internal Server Error`, used when a handler panics.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The response body: `{"message": ..., "httpcode": ...}`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "message": self.message,
            "httpcode": self.status.as_u16(),
        })
    }
}

impl Responder for HttpError {
    fn into_response(self) -> Response {
        let mut res = Response::new(VigilBody::from(self.to_json().to_string()));
        *res.status_mut() = self.status;
        res.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        res
    }
}
