//! Request dispatcher.
//!
//! The [`Router`] maps a path pattern and method to a handler. Before a handler
//! runs, the request goes through the route's authenticator, or the router's
//! default one if the route has none. A denied request never reaches the handler;
//! the [`Denial`](crate::auth::Denial) is turned into the response instead.
//!
//! # Examples
//!
//! ```rust
//! use vigil::{Method, router::Router, types::Request};
//! use vigil::auth::{NullAuthenticator, basic::{BasicAuthenticator, StaticUsers}};
//!
//! async fn secret(_req: Request) -> &'static str {
//!     "the cake is a lie"
//! }
//!
//! async fn index(_req: Request) -> &'static str {
//!     "hello"
//! }
//!
//! let mut router = Router::with_authenticator(
//!     BasicAuthenticator::new("api", StaticUsers::single("admin", "admin")),
//! );
//! router.route(Method::GET, "/secret", secret);
//! router
//!     .route(Method::GET, "/", index)
//!     .authenticator(NullAuthenticator);
//! ```

use std::{
    collections::{HashMap, hash_map::Entry},
    panic::AssertUnwindSafe,
    sync::Arc,
};

use futures_util::FutureExt;
use http::{HeaderValue, Method, StatusCode, header};
use tracing::{debug, error};

use crate::{
    auth::{AuthOutcome, Authenticator},
    error::HttpError,
    handler::Handler,
    responder::Responder,
    route::Route,
    types::{Request, Response},
};

/// Values captured by `{name}` segments of the matched route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(pub HashMap<String, String>);

impl PathParams {
    /// The value captured for `{name}`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

/// Method and path table with an optional default authenticator.
pub struct Router {
    paths: matchit::Router<usize>,
    patterns: HashMap<String, usize>,
    routes: Vec<HashMap<Method, Route>>,
    authenticator: Option<Arc<dyn Authenticator>>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// A router without a default authenticator: routes that do not set their
    /// own authenticator are public.
    pub fn new() -> Self {
        Self {
            paths: matchit::Router::new(),
            patterns: HashMap::new(),
            routes: Vec::new(),
            authenticator: None,
        }
    }

    /// A router that authenticates every route with `authenticator` unless the
    /// route overrides it.
    pub fn with_authenticator<A>(authenticator: A) -> Self
    where
        A: Authenticator,
    {
        let mut router = Self::new();
        router.authenticator = Some(Arc::new(authenticator));
        router
    }

    /// Registers `handler` for `method` on `path`.
    ///
    /// Registering the same method and path twice replaces the earlier route.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid pattern or conflicts with a registered one.
    pub fn route<H>(&mut self, method: Method, path: &str, handler: H) -> &mut Route
    where
        H: Handler,
    {
        let idx = match self.patterns.get(path) {
            Some(&idx) => idx,
            None => {
                let idx = self.routes.len();
                if let Err(err) = self.paths.insert(path, idx) {
                    panic!("cannot register route `{path}`: {err}");
                }
                self.patterns.insert(path.to_owned(), idx);
                self.routes.push(HashMap::new());
                idx
            }
        };

        let route = Route::new(path.to_owned(), method.clone(), Arc::new(handler));
        match self.routes[idx].entry(method) {
            Entry::Occupied(mut entry) => {
                entry.insert(route);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(route),
        }
    }

    /// Answers `req`.
    ///
    /// Unknown paths get `404`. A known path with an unregistered method gets
    /// `405` with an `Allow` header, but only once the router's default
    /// authenticator has accepted the request. Otherwise the route's
    /// authenticator (or the default) runs before the handler, and a handler that
    /// panics yields `500`.
    pub async fn dispatch(&self, mut req: Request) -> Response {
        let (idx, params) = match self.paths.at(req.uri().path()) {
            Ok(matched) => (
                *matched.value,
                matched
                    .params
                    .iter()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect::<HashMap<_, _>>(),
            ),
            Err(_) => {
                debug!(path = %req.uri().path(), "no route");
                return StatusCode::NOT_FOUND.into_response();
            }
        };

        let methods = &self.routes[idx];
        let Some(route) = methods.get(req.method()) else {
            // The method table of a path is only revealed to authenticated callers.
            if let Some(denied) = authenticate(self.authenticator.as_ref(), &req) {
                return denied;
            }
            debug!(method = %req.method(), path = %req.uri().path(), "method not allowed");
            return method_not_allowed(methods);
        };

        let authenticator = route.authenticator.as_ref().or(self.authenticator.as_ref());
        if let Some(denied) = authenticate(authenticator, &req) {
            return denied;
        }

        req.extensions_mut().insert(PathParams(params));

        match AssertUnwindSafe(route.handler.call(req)).catch_unwind().await {
            Ok(res) => res,
            Err(_) => {
                error!(method = %route.method(), path = %route.path(), "handler panicked");
                HttpError::internal().into_response()
            }
        }
    }
}

fn authenticate(authenticator: Option<&Arc<dyn Authenticator>>, req: &Request) -> Option<Response> {
    match authenticator?.authenticate_request(req) {
        AuthOutcome::Allowed => None,
        AuthOutcome::Denied(denial) => Some(denial.into_response()),
    }
}

fn method_not_allowed(methods: &HashMap<Method, Route>) -> Response {
    let mut allowed: Vec<&str> = methods.keys().map(Method::as_str).collect();
    allowed.sort_unstable();

    let mut res = HttpError::method_not_allowed().into_response();
    if let Ok(value) = HeaderValue::from_str(&allowed.join(", ")) {
        res.headers_mut().insert(header::ALLOW, value);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::Denial, body::VigilBody};

    struct DenyAll;

    impl Authenticator for DenyAll {
        fn authenticate_request(&self, _req: &Request) -> AuthOutcome {
            AuthOutcome::Denied(Denial::with_status(StatusCode::FORBIDDEN))
        }
    }

    async fn ok(_req: Request) -> &'static str {
        "ok"
    }

    fn request(method: Method, uri: &str) -> Request {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(VigilBody::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let mut router = Router::new();
        router.route(Method::GET, "/a", ok);
        let res = router.dispatch(request(Method::GET, "/b")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_method_is_405_with_allow() {
        let mut router = Router::new();
        router.route(Method::GET, "/a", ok);
        router.route(Method::POST, "/a", ok);
        let res = router.dispatch(request(Method::DELETE, "/a")).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.headers()[header::ALLOW], "GET, POST");
    }

    #[tokio::test]
    async fn unknown_method_is_authenticated_first() {
        let mut router = Router::with_authenticator(DenyAll);
        router.route(Method::GET, "/a", ok);
        let res = router.dispatch(request(Method::DELETE, "/a")).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert!(!res.headers().contains_key(header::ALLOW));
    }

    #[tokio::test]
    async fn route_override_beats_router_default() {
        let mut router = Router::with_authenticator(DenyAll);
        router.route(Method::GET, "/closed", ok);
        router
            .route(Method::GET, "/open", ok)
            .authenticator(crate::auth::NullAuthenticator);

        let res = router.dispatch(request(Method::GET, "/closed")).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let res = router.dispatch(request(Method::GET, "/open")).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn re_registering_replaces_route() {
        let mut router = Router::new();
        router.route(Method::GET, "/a", ok).authenticator(DenyAll);
        let route = router.route(Method::GET, "/a", ok);
        assert!(!route.has_authenticator());
    }

    #[test]
    #[should_panic]
    fn conflicting_pattern_panics() {
        let mut router = Router::new();
        router.route(Method::GET, "/users/{id}", ok);
        router.route(Method::GET, "/users/{name}", ok);
    }
}
