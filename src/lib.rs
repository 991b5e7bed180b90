//! HTTP request authentication built on the RFC 7235 framework.
//!
//! The crate has two halves:
//!
//! - [`rfc7235`]: the `Authorization`/`WWW-Authenticate` grammar, parsing of
//!   credentials and rendering of challenges.
//! - [`auth`]: the [`Authenticator`](auth::Authenticator) contract and the RFC 7617
//!   [`BasicAuthenticator`](auth::basic::BasicAuthenticator), wired into a small
//!   hyper-based [`router`] that runs the authenticator before every handler.

pub mod auth;
pub mod body;
pub mod config;
pub mod error;
pub mod handler;
pub mod responder;
pub mod rfc7235;
pub mod route;
pub mod router;
pub mod server;
pub mod types;

#[cfg(feature = "vigil-tracing")]
pub mod tracing;

pub use http::Method;
pub use server::serve;
