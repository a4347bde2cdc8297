use bytes::Bytes;
use http_body_util::Full;
use hyper::{
    StatusCode,
    header::{self, HeaderValue},
};

use super::Response;


/// Creates a response with the given status, `Content-Type` and body.
fn with_body(
    status: StatusCode,
    content_type: &'static str,
    body: impl Into<Bytes>,
) -> Response {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response.headers_mut().insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

pub(super) fn not_found() -> Response {
    with_body(StatusCode::NOT_FOUND, "text/plain; charset=UTF-8", "404 Not found")
}

pub(super) fn method_not_allowed() -> Response {
    with_body(StatusCode::METHOD_NOT_ALLOWED, "text/plain; charset=UTF-8", "405 Method not allowed")
}

pub(super) fn length_required() -> Response {
    with_body(StatusCode::LENGTH_REQUIRED, "text/plain; charset=UTF-8", "411 Length required")
}

pub(super) fn payload_too_large() -> Response {
    with_body(StatusCode::PAYLOAD_TOO_LARGE, "text/plain; charset=UTF-8", "413 Payload too large")
}

pub(super) fn internal_server_error() -> Response {
    with_body(StatusCode::INTERNAL_SERVER_ERROR, "text/plain; charset=UTF-8", "Internal server error")
}
