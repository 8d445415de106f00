//! HTTP response building module
//!
//! Provides the shared body type and builders for status-only responses.

use bytes::Bytes;
use http_body_util::{combinators::BoxBody, BodyExt, Empty, Full};
use hyper::header::{HeaderMap, HeaderValue, ALLOW, CONTENT_LENGTH, CONTENT_RANGE};
use hyper::{Response, StatusCode};

/// Response body used throughout the server: buffered or streamed from disk
pub type ServeBody = BoxBody<Bytes, std::io::Error>;

/// Empty body
pub fn empty_body() -> ServeBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

/// Buffered body
pub fn full_body(data: impl Into<Bytes>) -> ServeBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

/// Build a response from a status and a prepared header map
pub fn build_response(status: StatusCode, headers: HeaderMap, body: ServeBody) -> Response<ServeBody> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Build 304 Not Modified response on top of already-set headers
pub fn build_304_response(headers: HeaderMap) -> Response<ServeBody> {
    build_response(StatusCode::NOT_MODIFIED, headers, empty_body())
}

/// Build 404 Not Found response (no body)
pub fn build_404_response() -> Response<ServeBody> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
    build_response(StatusCode::NOT_FOUND, headers, empty_body())
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ServeBody> {
    let mut headers = HeaderMap::new();
    headers.insert(ALLOW, HeaderValue::from_static("GET, HEAD, OPTIONS"));
    build_response(
        StatusCode::METHOD_NOT_ALLOWED,
        headers,
        full_body("Method Not Allowed"),
    )
}

/// Build OPTIONS response
pub fn build_options_response() -> Response<ServeBody> {
    let mut headers = HeaderMap::new();
    headers.insert(ALLOW, HeaderValue::from_static("GET, HEAD, OPTIONS"));
    build_response(StatusCode::NO_CONTENT, headers, empty_body())
}

/// Build 416 Range Not Satisfiable response on top of already-set headers
pub fn build_416_response(mut headers: HeaderMap, file_size: u64) -> Response<ServeBody> {
    if let Ok(value) = HeaderValue::from_str(&format!("bytes */{file_size}")) {
        headers.insert(CONTENT_RANGE, value);
    }
    build_response(StatusCode::RANGE_NOT_SATISFIABLE, headers, empty_body())
}

/// Build 500 response for failures before any byte was sent
pub fn build_500_response() -> Response<ServeBody> {
    build_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        HeaderMap::new(),
        full_body("Internal Server Error"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_416_keeps_existing_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("vary", HeaderValue::from_static("Accept-Encoding"));
        let resp = build_416_response(headers, 1000);
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(resp.headers()[CONTENT_RANGE], "bytes */1000");
        assert_eq!(resp.headers()["vary"], "Accept-Encoding");
    }

    #[test]
    fn test_304_keeps_existing_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("server", HeaderValue::from_static("swan"));
        let resp = build_304_response(headers);
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(resp.headers()["server"], "swan");
        assert!(!resp.headers().contains_key(CONTENT_LENGTH));
    }

    #[test]
    fn test_405_lists_allowed_methods() {
        let resp = build_405_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], "GET, HEAD, OPTIONS");
    }
}
