use bytes::Bytes;
use http_body_util::Full;
use hyper::{
    body::Incoming,
    header::{self, HeaderValue},
    Method, Request, StatusCode,
};
use std::{sync::Arc, time::Instant};

use crate::{api, prelude::*};
use super::{Context, Response, log, response};


/// Maximum size of a request body we are willing to read.
const MAX_BODY_SIZE: u64 = 1024 * 1024;

/// This is the main HTTP entry point, called for each incoming request.
pub(super) async fn handle(req: Request<Incoming>, ctx: Arc<Context>) -> Response {
    log::req::log(&req);
    if ctx.config.log.log_http_headers {
        log::headers::log(&req);
    }

    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    match path.as_str() {
        // The GraphQL API, reachable from any origin.
        "/graphql" => {
            let mut response = match method {
                Method::OPTIONS => preflight(&req),
                Method::GET | Method::POST => handle_api(req, &ctx).await,
                _ => response::method_not_allowed(),
            };
            response.headers_mut()
                .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
            response
        }

        // The interactive GraphQL API explorer/IDE.
        "/" | "/graphiql" if method == Method::GET || method == Method::HEAD => {
            into_full(juniper_hyper::graphiql("/graphql", None).await)
        }
        "/" | "/graphiql" => response::method_not_allowed(),

        path => {
            debug!("Responding with 404 to {:?} '{}'", method, path);
            response::not_found()
        }
    }
}

/// Answers a CORS preflight request. We allow everything: the API is public
/// and does not use cookies.
fn preflight<B>(req: &Request<B>) -> Response {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = StatusCode::NO_CONTENT;
    let allowed_headers = req.headers()
        .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .cloned()
        .unwrap_or(HeaderValue::from_static("Content-Type"));

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, allowed_headers);
    headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));
    response
}

/// Handles a `GET` or `POST` request to `/graphql`. Parsing the request
/// (query parameters, JSON body, batches or `application/graphql`) and
/// choosing the status code is done by `juniper_hyper`.
async fn handle_api(req: Request<Incoming>, ctx: &Context) -> Response {
    if let Err(response) = check_body_size(&req) {
        return response;
    }

    let before = Instant::now();
    let api_context = Arc::new(api::Context { store: Arc::clone(&ctx.store) });
    let out = juniper_hyper::graphql(Arc::clone(&ctx.api_root), api_context, req).await;

    debug!(
        "Finished /graphql query in {:.2?} (status {})",
        before.elapsed(),
        out.status().as_u16(),
    );
    into_full(out)
}

/// `juniper_hyper` reads the whole body into memory, so the size has to be
/// checked up front. hyper makes sure the body is not longer than the
/// announced `Content-Length`.
fn check_body_size<B>(req: &Request<B>) -> Result<(), Response> {
    if req.method() != Method::POST {
        return Ok(());
    }

    let length = req.headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    match length {
        None => Err(response::length_required()),
        Some(len) if len > MAX_BODY_SIZE => {
            debug!("Rejecting request body of {len} bytes");
            Err(response::payload_too_large())
        }
        Some(_) => Ok(()),
    }
}

fn into_full(response: hyper::Response<String>) -> Response {
    response.map(|body| Full::new(Bytes::from(body)))
}
