//! End-to-end dispatch through `Router` with Basic authentication.

use base64::{Engine, engine::general_purpose::STANDARD};
use http::{StatusCode, header};
use http_body_util::BodyExt;
use vigil::{
    Method,
    auth::{
        AuthOutcome, Authenticator, Denial, NullAuthenticator,
        basic::{BasicAuthenticator, StaticUsers},
    },
    body::VigilBody,
    config::Config,
    error::HttpError,
    router::{PathParams, Router},
    types::{Request, Response},
};

async fn secret(_: Request) -> &'static str {
    "secret"
}

async fn echo_id(req: Request) -> String {
    req.extensions()
        .get::<PathParams>()
        .and_then(|p| p.get("id"))
        .unwrap_or_default()
        .to_owned()
}

async fn boom(_: Request) -> &'static str {
    panic!("handler failure")
}

fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
}

fn get(uri: &str, authorization: Option<&str>) -> Request {
    let mut builder = http::Request::builder().method(Method::GET).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(VigilBody::empty()).unwrap()
}

fn put(uri: &str, authorization: Option<&str>) -> Request {
    let mut builder = http::Request::builder().method(Method::PUT).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(VigilBody::empty()).unwrap()
}

async fn body_string(res: Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn router() -> Router {
    let auth = BasicAuthenticator::new("vault", StaticUsers::single("alice", "wonderland"));
    let mut router = Router::with_authenticator(auth);
    router.route(Method::GET, "/secret", secret);
    router.route(Method::GET, "/items/{id}", echo_id);
    router.route(Method::GET, "/boom", boom);
    router
        .route(Method::GET, "/public", secret)
        .authenticator(NullAuthenticator);
    router
}

#[tokio::test]
async fn missing_header_gets_challenge() {
    let res = router().dispatch(get("/secret", None)).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let challenge = res.headers()[header::WWW_AUTHENTICATE].to_str().unwrap();
    assert!(challenge.starts_with("Basic realm=\""));
    assert_eq!(challenge, "Basic realm=\"vault\", charset=\"UTF-8\"");
}

#[tokio::test]
async fn other_scheme_is_denied() {
    let res = router().dispatch(get("/secret", Some("Bearer xyz"))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key(header::WWW_AUTHENTICATE));
}

#[tokio::test]
async fn garbage_header_is_denied() {
    let res = router().dispatch(get("/secret", Some("Basic !!!"))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = router().dispatch(get("/secret", Some("   "))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_credentials_reach_handler() {
    let header = basic("alice", "wonderland");
    let res = router().dispatch(get("/secret", Some(&header))).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(!res.headers().contains_key(header::WWW_AUTHENTICATE));
    assert_eq!(body_string(res).await, "secret");
}

#[tokio::test]
async fn wrong_password_is_denied() {
    let header = basic("alice", "looking-glass");
    let res = router().dispatch(get("/secret", Some(&header))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(body_string(res).await.is_empty());
}

#[tokio::test]
async fn unpadded_token_is_accepted() {
    let token = STANDARD.encode("alice:wonderland");
    let header = format!("Basic {}", token.trim_end_matches('='));
    let res = router().dispatch(get("/secret", Some(&header))).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn route_override_makes_endpoint_public() {
    let res = router().dispatch(get("/public", None)).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn path_params_are_available_to_handler() {
    let header = basic("alice", "wonderland");
    let res = router().dispatch(get("/items/42", Some(&header))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_string(res).await, "42");
}

#[tokio::test]
async fn panicking_handler_yields_500() {
    let header = basic("alice", "wonderland");
    let res = router().dispatch(get("/boom", Some(&header))).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let res = router().dispatch(get("/nope", None)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unauthenticated_unknown_method_gets_challenge() {
    let res = router().dispatch(put("/secret", None)).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(!res.headers().contains_key(header::ALLOW));
    assert_eq!(
        res.headers()[header::WWW_AUTHENTICATE],
        "Basic realm=\"vault\", charset=\"UTF-8\""
    );
}

#[tokio::test]
async fn authenticated_unknown_method_is_405() {
    let header = basic("alice", "wonderland");
    let res = router().dispatch(put("/secret", Some(&header))).await;

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers()[header::ALLOW], "GET");
    let body: serde_json::Value = serde_json::from_str(&body_string(res).await).unwrap();
    assert_eq!(body["httpcode"], 405);
}

#[tokio::test]
async fn router_without_authenticator_is_open() {
    let mut router = Router::new();
    router.route(Method::GET, "/secret", secret);
    let res = router.dispatch(get("/secret", None)).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn authenticator_from_config() {
    let config = Config::from_pairs([
        ("VIGIL_REALM", "staff"),
        ("VIGIL_CHARSET", "ISO-8859-1"),
        ("VIGIL_USERS", "j\u{f6}rg:pw"),
    ])
    .unwrap();
    let auth = BasicAuthenticator::from_config(&config, config.static_users().unwrap());
    let mut router = Router::with_authenticator(auth);
    router.route(Method::GET, "/secret", secret);

    let header = format!("Basic {}", STANDARD.encode(b"j\xf6rg:pw"));
    let res = router.dispatch(get("/secret", Some(&header))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = router.dispatch(get("/secret", None)).await;
    assert_eq!(
        res.headers()[header::WWW_AUTHENTICATE],
        "Basic realm=\"staff\", charset=\"ISO-8859-1\""
    );
}

struct Locked;

impl Authenticator for Locked {
    fn authenticate_request(&self, req: &Request) -> AuthOutcome {
        let denial = match req.uri().path() {
            "/json" => Denial::with_status(StatusCode::FORBIDDEN)
                .json(serde_json::json!({ "locked": true })),
            "/text" => Denial::unauthorized().text("locked"),
            _ => Denial::unauthorized().error(HttpError::new(StatusCode::LOCKED, "locked")),
        };
        AuthOutcome::Denied(denial)
    }
}

#[tokio::test]
async fn custom_authenticator_bodies() {
    let mut router = Router::with_authenticator(Locked);
    for path in ["/json", "/text", "/error"] {
        router.route(Method::GET, path, secret);
    }

    let res = router.dispatch(get("/json", None)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_string(res).await, r#"{"locked":true}"#);

    let res = router.dispatch(get("/text", None)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_string(res).await, "locked");

    let res = router.dispatch(get("/error", None)).await;
    assert_eq!(res.status(), StatusCode::LOCKED);
    let body: serde_json::Value = serde_json::from_str(&body_string(res).await).unwrap();
    assert_eq!(body["httpcode"], 423);
}
