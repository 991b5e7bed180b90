//! A single method/path endpoint.
//!
//! Routes are created through [`Router::route`](crate::router::Router::route), which
//! hands back a `&mut Route` so the endpoint can be given its own authenticator:
//!
//! ```rust
//! use vigil::{Method, auth::NullAuthenticator, router::Router, types::Request};
//!
//! async fn health(_req: Request) -> &'static str {
//!     "ok"
//! }
//!
//! let mut router = Router::new();
//! router
//!     .route(Method::GET, "/health", health)
//!     .authenticator(NullAuthenticator);
//! ```

use std::{fmt, sync::Arc};

use http::Method;

use crate::{auth::Authenticator, types::BoxHandler};

/// A handler registered for one method on one path pattern, with an optional
/// authenticator that replaces the router's default.
pub struct Route {
    path: String,
    method: Method,
    pub(crate) handler: BoxHandler,
    pub(crate) authenticator: Option<Arc<dyn Authenticator>>,
}

impl Route {
    pub(crate) fn new(path: String, method: Method, handler: BoxHandler) -> Self {
        Self {
            path,
            method,
            handler,
            authenticator: None,
        }
    }

    /// The pattern this route was registered with, e.g. `/users/{id}`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Overrides the router's default authenticator for this route.
    pub fn authenticator<A>(&mut self, authenticator: A) -> &mut Self
    where
        A: Authenticator,
    {
        self.authenticator = Some(Arc::new(authenticator));
        self
    }

    /// Returns `true` if this route overrides the router's authenticator.
    pub fn has_authenticator(&self) -> bool {
        self.authenticator.is_some()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("authenticator", &self.authenticator.is_some())
            .finish()
    }
}
