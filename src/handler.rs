use std::future::Future;

use crate::{
    responder::Responder,
    types::{Request, Response},
};

/// Route handler. Implemented for every `async fn(Request) -> impl Responder`.
#[async_trait::async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn call(&self, req: Request) -> Response;
}

#[async_trait::async_trait]
impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: Responder + Send + 'static,
{
    async fn call(&self, req: Request) -> Response {
        (self)(req).await.into_response()
    }
}
