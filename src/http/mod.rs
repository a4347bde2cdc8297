//! The HTTP server, handler and routes.
//!
//! This file itself contains fairly little logic and just sets up the `hyper`
//! server and catches panics. Routing and the GraphQL endpoint are in
//! `handlers.rs`.

use bytes::Bytes;
use futures::FutureExt;
use http_body_util::Full;
use hyper::service::service_fn;
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto,
};
use std::{
    convert::Infallible,
    future::Future,
    net::{IpAddr, SocketAddr},
    panic::AssertUnwindSafe,
    sync::Arc,
};
use tokio::net::TcpListener;

use crate::{api, config::Config, db::DocumentStore, prelude::*};
use self::handlers::handle;


mod handlers;
mod log;
mod response;


/// HTTP server configuration.
#[derive(Debug, Clone, confique::Config)]
pub(crate) struct HttpConfig {
    /// The TCP port the HTTP server should listen on.
    #[config(default = 8080)]
    pub(crate) port: u16,

    /// The bind address to listen on.
    #[config(default = "0.0.0.0")]
    pub(crate) address: IpAddr,
}


// All our responses have a body that is fully in memory.
type Response = hyper::Response<Full<Bytes>>;


/// Context that the request handler has access to.
pub(crate) struct Context {
    pub(crate) api_root: Arc<api::RootNode>,
    pub(crate) store: Arc<dyn DocumentStore>,
    pub(crate) config: Config,
}


/// Starts the HTTP server. The future returned by this function must be awaited
/// to actually run it. It only returns if binding the socket fails.
pub(crate) async fn serve(
    config: Config,
    api_root: api::RootNode,
    store: Arc<dyn DocumentStore>,
) -> Result<()> {
    let addr = SocketAddr::new(config.http.address, config.http.port);
    let ctx = Arc::new(Context {
        api_root: Arc::new(api_root),
        store,
        config,
    });

    let listener = TcpListener::bind(addr).await
        .with_context(|| format!("failed to bind to {addr}"))?;
    info!("Listening on http://{}", listener.local_addr()?);

    accept_connections(listener, ctx).await;
    Ok(())
}

/// Accepts connections on `listener` forever. Every connection gets its own
/// task. Requests on that connection are dispatched by hyper; all of them only
/// share the immutable `ctx`.
async fn accept_connections(listener: TcpListener, ctx: Arc<Context>) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to accept TCP connection: {e}");
                continue;
            }
        };

        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            let service = service_fn(move |req| {
                handle_internal_errors(handle(req, Arc::clone(&ctx)))
            });

            let res = auto::Builder::new(TokioExecutor::new())
                .serve_connection(TokioIo::new(stream), service)
                .await;
            if let Err(e) = res {
                debug!("Error while serving connection from {peer}: {e}");
            }
        });
    }
}

/// This just wraps another future and catches all panics that might occur when
/// resolving/polling that given future. This ensures that we always answer with
/// `500` instead of just closing the connection.
async fn handle_internal_errors(
    future: impl Future<Output = Response>,
) -> Result<Response, Infallible> {
    // The `AssertUnwindSafe` says: if the future panics, the remaining
    // application state is not broken. That holds as all shared state is
    // immutable.
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(response) => Ok(response),
        Err(panic) => {
            // For most panics (which use `panic!` like `println!`), this is
            // either `&str` or `String`.
            let msg = panic.downcast_ref::<String>()
                .map(|s| s.as_str())
                .or(panic.downcast_ref::<&str>().copied());

            match msg {
                Some(msg) => error!("INTERNAL SERVER ERROR: HTTP handler panicked: '{}'", msg),
                None => error!("INTERNAL SERVER ERROR: HTTP handler panicked"),
            }

            Ok(response::internal_server_error())
        }
    }
}


#[cfg(test)]
mod tests {
    use super::handle_internal_errors;

    #[tokio::test]
    async fn panic_becomes_500() {
        let future = async {
            if true {
                panic!("oh no");
            }
            super::response::not_found()
        };
        let response = handle_internal_errors(future).await.unwrap();
        assert_eq!(response.status(), hyper::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
