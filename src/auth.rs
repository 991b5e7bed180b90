//! Request authentication.
//!
//! An [`Authenticator`] looks at a request before any route logic runs and either
//! lets it through or returns a [`Denial`] describing the response the client must
//! receive: status code, optional body and extra headers (typically a
//! `WWW-Authenticate` challenge). The router turns a denial into the final
//! response, so authenticators never write to the connection themselves.
//!
//! # Examples
//!
//! ```rust
//! use vigil::auth::{AuthOutcome, Authenticator, Denial};
//! use vigil::types::Request;
//!
//! struct HeaderKey(&'static str);
//!
//! impl Authenticator for HeaderKey {
//!     fn authenticate_request(&self, req: &Request) -> AuthOutcome {
//!         match req.headers().get("x-api-key") {
//!             Some(v) if v == self.0 => AuthOutcome::Allowed,
//!             _ => AuthOutcome::Denied(Denial::unauthorized()),
//!         }
//!     }
//! }
//! ```

use std::sync::Arc;

use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};

use crate::{
    body::VigilBody,
    error::HttpError,
    responder::Responder,
    types::{Request, Response},
};

pub mod basic;

pub use basic::{BasicAuthenticator, PasswordMatcher, StaticUsers};

/// Decides whether a request may proceed.
///
/// Implementations are shared read-only by every connection task, so they must be
/// `Send + Sync` and should be immutable once built.
pub trait Authenticator: Send + Sync + 'static {
    fn authenticate_request(&self, req: &Request) -> AuthOutcome;
}

impl<A> Authenticator for Arc<A>
where
    A: Authenticator + ?Sized,
{
    fn authenticate_request(&self, req: &Request) -> AuthOutcome {
        (**self).authenticate_request(req)
    }
}

/// Result of [`Authenticator::authenticate_request`].
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Allowed,
    Denied(Denial),
}

impl AuthOutcome {
    /// Returns `true` for [`AuthOutcome::Allowed`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthOutcome::Allowed)
    }

    /// The denial, if the request was rejected.
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            AuthOutcome::Allowed => None,
            AuthOutcome::Denied(denial) => Some(denial),
        }
    }
}

/// Body sent with a denied request.
#[derive(Debug, Clone, PartialEq)]
pub enum DenialBody {
    /// Sent as-is; its own status code wins over [`Denial::status`].
    Error(HttpError),
    /// Serialized as `application/json` with the denial status.
    Json(serde_json::Value),
    /// Sent as `text/plain` with the denial status.
    Text(String),
}

/// Everything the dispatcher needs to answer a rejected request.
///
/// The status defaults to `401 Unauthorized`. Headers behave like a map from name
/// to a set of values: adding a value that is already present for that name does
/// nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Denial {
    status: StatusCode,
    body: Option<DenialBody>,
    headers: HeaderMap,
}

impl Default for Denial {
    fn default() -> Self {
        Self::unauthorized()
    }
}

impl Denial {
    /// An empty `401 Unauthorized` denial.
    pub fn unauthorized() -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED)
    }

    /// An empty denial answered with `status`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use http::StatusCode;
    /// use vigil::auth::Denial;
    ///
    /// let denial = Denial::with_status(StatusCode::FORBIDDEN).text("account locked");
    /// assert_eq!(denial.status(), StatusCode::FORBIDDEN);
    /// ```
    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status,
            body: None,
            headers: HeaderMap::new(),
        }
    }

    /// Status sent unless the body is a [`DenialBody::Error`].
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// The body to send; `None` means an empty body.
    pub fn body(&self) -> Option<&DenialBody> {
        self.body.as_ref()
    }

    pub fn set_body(&mut self, body: DenialBody) {
        self.body = Some(body);
    }

    /// Headers attached to the response whatever the body is.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Adds `value` to the set of values for `name`.
    ///
    /// Returns `false` if `value` is not a legal header value.
    pub fn add_header(&mut self, name: HeaderName, value: &str) -> bool {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.add_header_value(name, value);
                true
            }
            Err(_) => false,
        }
    }

    /// Like [`Denial::add_header`] for an already validated value.
    pub fn add_header_value(&mut self, name: HeaderName, value: HeaderValue) {
        if !self.headers.get_all(&name).iter().any(|v| *v == value) {
            self.headers.append(name, value);
        }
    }

    /// Builder form of [`Denial::add_header_value`].
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.add_header_value(name, value);
        self
    }

    /// Sends `payload` as `application/json`.
    pub fn json(mut self, payload: serde_json::Value) -> Self {
        self.body = Some(DenialBody::Json(payload));
        self
    }

    /// Sends `text` as `text/plain`.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.body = Some(DenialBody::Text(text.into()));
        self
    }

    /// Sends `err` as-is, with its own status.
    pub fn error(mut self, err: HttpError) -> Self {
        self.body = Some(DenialBody::Error(err));
        self
    }
}

impl Responder for Denial {
    fn into_response(self) -> Response {
        let mut res = match self.body {
            Some(DenialBody::Error(err)) => err.into_response(),
            Some(DenialBody::Json(payload)) => {
                let mut res = (self.status, payload).into_response();
                res.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                res
            }
            Some(DenialBody::Text(text)) => {
                let mut res = (self.status, text).into_response();
                res.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; charset=utf-8"),
                );
                res
            }
            None => {
                let mut res = Response::new(VigilBody::empty());
                *res.status_mut() = self.status;
                res
            }
        };

        res.headers_mut().extend(self.headers);
        res
    }
}

/// Lets every request through.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAuthenticator;

impl Authenticator for NullAuthenticator {
    fn authenticate_request(&self, _req: &Request) -> AuthOutcome {
        AuthOutcome::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn request() -> Request {
        http::Request::builder()
            .uri("/")
            .body(VigilBody::empty())
            .unwrap()
    }

    async fn body_string(res: Response) -> String {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn null_authenticator_allows_everything() {
        assert!(NullAuthenticator.authenticate_request(&request()).is_allowed());
    }

    #[test]
    fn header_values_form_a_set() {
        let mut denial = Denial::unauthorized();
        assert!(denial.add_header(header::WWW_AUTHENTICATE, "Basic realm=\"a\""));
        assert!(denial.add_header(header::WWW_AUTHENTICATE, "Basic realm=\"a\""));
        assert!(denial.add_header(header::WWW_AUTHENTICATE, "Bearer"));
        assert!(!denial.add_header(header::WWW_AUTHENTICATE, "bad\nvalue"));

        let values: Vec<_> = denial
            .headers()
            .get_all(header::WWW_AUTHENTICATE)
            .iter()
            .collect();
        assert_eq!(values, ["Basic realm=\"a\"", "Bearer"]);
    }

    #[tokio::test]
    async fn empty_denial_defaults_to_401() {
        let res = Denial::default().into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(res).await.is_empty());
    }

    #[tokio::test]
    async fn json_body_uses_denial_status() {
        let res = Denial::with_status(StatusCode::FORBIDDEN)
            .json(serde_json::json!({ "reason": "expired" }))
            .header(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"))
            .into_response();

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Bearer");
        assert_eq!(body_string(res).await, r#"{"reason":"expired"}"#);
    }

    #[tokio::test]
    async fn error_body_keeps_its_own_status() {
        let res = Denial::unauthorized()
            .error(HttpError::new(StatusCode::PAYMENT_REQUIRED, "quota exhausted"))
            .into_response();

        assert_eq!(res.status(), StatusCode::PAYMENT_REQUIRED);
        let body: serde_json::Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(body["message"], "quota exhausted");
        assert_eq!(body["httpcode"], 402);
    }

    #[tokio::test]
    async fn text_body_is_plain_text() {
        let res = Denial::unauthorized().text("go away").into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            res.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_string(res).await, "go away");
    }
}
