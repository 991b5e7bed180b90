//! HTTP/1.1 server.
//!
//! [`serve`] accepts connections on a tokio listener and dispatches every request
//! through the [`Router`], one task per connection.
//!
//! # Examples
//!
//! ```rust,no_run
//! use vigil::{serve, router::Router, Method, types::Request};
//! use tokio::net::TcpListener;
//!
//! async fn hello(_: Request) -> &'static str {
//!     "Hello, World!"
//! }
//!
//! # async fn example() -> std::io::Result<()> {
//! let listener = TcpListener::bind("127.0.0.1:8080").await?;
//! let mut router = Router::new();
//! router.route(Method::GET, "/", hello);
//! serve(listener, router).await?;
//! # Ok(())
//! # }
//! ```

use std::{convert::Infallible, io, sync::Arc};

use hyper::{body::Incoming, server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{body::VigilBody, router::Router};

/// Serves `router` on `listener` until accepting a connection fails.
pub async fn serve(listener: TcpListener, router: Router) -> io::Result<()> {
    #[cfg(feature = "vigil-tracing")]
    crate::tracing::init_tracing();

    let router = Arc::new(router);

    info!(addr = %listener.local_addr()?, "vigil listening");

    loop {
        let (stream, addr) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let router = router.clone();

        tokio::spawn(async move {
            let svc = service_fn(move |req: hyper::Request<Incoming>| {
                let router = router.clone();
                async move {
                    let mut req = req.map(VigilBody::new);
                    req.extensions_mut().insert(addr);
                    Ok::<_, Infallible>(router.dispatch(req).await)
                }
            });

            let mut http = http1::Builder::new();
            http.keep_alive(true);

            if let Err(err) = http.serve_connection(io, svc).await {
                error!(%addr, %err, "error serving connection");
            }
        });
    }
}
