use anyhow::Context;
use http::StatusCode;
use tokio::net::TcpListener;
use vigil::{
    Method,
    auth::{NullAuthenticator, basic::BasicAuthenticator},
    config::Config,
    error::HttpError,
    responder::Responder,
    router::{PathParams, Router},
    serve,
    types::Request,
};

async fn index(_: Request) -> impl Responder {
    "public area"
}

async fn secret(_: Request) -> impl Responder {
    (StatusCode::OK, "welcome to the restricted area")
}

async fn document(req: Request) -> Result<String, HttpError> {
    let id = req
        .extensions()
        .get::<PathParams>()
        .and_then(|params| params.get("id"))
        .ok_or_else(|| HttpError::new(StatusCode::BAD_REQUEST, "missing document id"))?;

    Ok(format!("document {id}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    #[cfg(feature = "vigil-tracing")]
    vigil::tracing::init_tracing();

    let config = Config::from_env()?;
    let users = config.static_users()?;
    if users.is_empty() {
        tracing::warn!("VIGIL_USERS is empty, every protected request will be rejected");
    }

    let mut router = Router::with_authenticator(BasicAuthenticator::from_config(&config, users));
    router.route(Method::GET, "/secret", secret);
    router.route(Method::GET, "/documents/{id}", document);
    router
        .route(Method::GET, "/", index)
        .authenticator(NullAuthenticator);

    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("cannot bind {}", config.bind))?;

    serve(listener, router).await?;
    Ok(())
}
