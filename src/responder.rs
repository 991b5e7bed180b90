//! Response generation utilities and trait implementations for HTTP responses.
//!
//! This module provides the `Responder` trait that lets handlers return plain
//! strings, status/body pairs, errors or fully built responses. Everything a
//! handler or an authenticator produces goes through `into_response` before it
//! reaches the connection.
//!
//! # Examples
//!
//! ```rust
//! use vigil::responder::Responder;
//! use http::StatusCode;
//!
//! let response = "Hello, World!".into_response();
//! let response = (StatusCode::OK, "Success").into_response();
//! let response = ().into_response();
//! ```

use std::{convert::Infallible, fmt::Display};

use http::StatusCode;

use crate::{body::VigilBody, types::Response};

/// Trait for converting types into HTTP responses.
pub trait Responder {
    /// Converts the implementing type into an HTTP response.
    fn into_response(self) -> Response;
}

impl Responder for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl Responder for VigilBody {
    fn into_response(self) -> Response {
        Response::new(self)
    }
}

impl Responder for &'static str {
    fn into_response(self) -> Response {
        Response::new(VigilBody::from(self))
    }
}

impl Responder for String {
    fn into_response(self) -> Response {
        Response::new(VigilBody::from(self))
    }
}

impl Responder for () {
    fn into_response(self) -> Response {
        Response::new(VigilBody::empty())
    }
}

impl Responder for StatusCode {
    fn into_response(self) -> Response {
        let mut res = Response::new(VigilBody::empty());
        *res.status_mut() = self;
        res
    }
}

impl Responder for Infallible {
    fn into_response(self) -> Response {
        match self {}
    }
}

impl<R> Responder for (StatusCode, R)
where
    R: Display,
{
    fn into_response(self) -> Response {
        let (status, body) = self;
        let mut res = Response::new(VigilBody::from(body.to_string()));
        *res.status_mut() = status;
        res
    }
}

impl<T, E> Responder for Result<T, E>
where
    T: Responder,
    E: Responder,
{
    fn into_response(self) -> Response {
        match self {
            Ok(ok) => ok.into_response(),
            Err(err) => err.into_response(),
        }
    }
}
