//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, dispatch to
//! the static engine, and access logging.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use hyper::header::{self, HeaderMap};
use hyper::{Method, Request, Response, Version};

use crate::config::AppState;
use crate::http::{self, ServeBody};
use crate::logger::{self, AccessLogEntry};
use crate::serve::{RequestContext, SpaFallback};

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ServeBody>, Infallible> {
    let started = Instant::now();

    // 1. Check HTTP method
    let response = match check_http_method(req.method()) {
        Some(resp) => resp,
        None => {
            // 2. Serve from the static engine; the Server header rides along
            //    as an upstream header
            let ctx = RequestContext::new(&req);
            let mut outgoing = HeaderMap::new();
            if let Some(server) = &state.server_header {
                outgoing.insert(header::SERVER, server.clone());
            }
            state.server.respond(&ctx, outgoing).await
        }
    };

    // 3. Access log
    if state.config.logging.access_log {
        let entry = access_entry(&req, &response, peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<ServeBody>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn access_entry<B>(
    req: &Request<B>,
    response: &Response<ServeBody>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let request_header = |name: header::HeaderName| header_string(req.headers(), name);

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = if *req.method() == Method::HEAD {
        0
    } else {
        response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    };
    entry.referer = request_header(header::REFERER);
    entry.user_agent = request_header(header::USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry.content_encoding = header_string(response.headers(), header::CONTENT_ENCODING);
    entry.content_range = header_string(response.headers(), header::CONTENT_RANGE);
    entry.spa_fallback = response.extensions().get::<SpaFallback>().is_some();
    entry
}

fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use hyper::StatusCode;
    use std::fs;

    fn state(root: &std::path::Path) -> Arc<AppState> {
        let mut config = Config::load_from("/nonexistent/swan-serve-config").unwrap();
        config.static_files.root = root.to_string_lossy().into_owned();
        config.logging.access_log = false;
        config.http.server_name = "swan-test".to_string();
        AppState::new(&config).unwrap()
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_get_sets_server_header() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "home").unwrap();
        let req = Request::get("/").body(()).unwrap();

        let resp = handle_request(req, state(dir.path()), peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::SERVER], "swan-test");
    }

    #[tokio::test]
    async fn test_post_is_405() {
        let dir = tempfile::tempdir().unwrap();
        let req = Request::post("/").body(()).unwrap();
        let resp = handle_request(req, state(dir.path()), peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_options_is_204() {
        let dir = tempfile::tempdir().unwrap();
        let req = Request::options("/").body(()).unwrap();
        let resp = handle_request(req, state(dir.path()), peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(resp.headers().contains_key(header::ALLOW));
    }

    #[test]
    fn test_access_entry_fields() {
        let req = Request::get("/a.js?v=2")
            .header(header::USER_AGENT, "curl/8")
            .body(())
            .unwrap();
        let resp = http::build_404_response();
        let entry = access_entry(&req, &resp, peer(), Instant::now());
        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.path, "/a.js");
        assert_eq!(entry.query.as_deref(), Some("v=2"));
        assert_eq!(entry.status, 404);
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8"));
        assert!(entry.referer.is_none());
        assert!(!entry.spa_fallback);
    }

    #[tokio::test]
    async fn test_access_entry_records_engine_outcome() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "shell").unwrap();
        fs::write(dir.path().join("app.js"), "plain").unwrap();
        fs::write(dir.path().join("app.js.br"), "brotli").unwrap();
        let mut config = Config::load_from("/nonexistent/swan-serve-config").unwrap();
        config.static_files.root = dir.path().to_string_lossy().into_owned();
        config.static_files.brotli = true;
        config.static_files.single = crate::config::SingleSetting::Flag(true);
        let state = AppState::new(&config).unwrap();

        let req = Request::get("/app.js")
            .header(header::ACCEPT_ENCODING, "br")
            .header(header::RANGE, "bytes=0-2")
            .body(())
            .unwrap();
        let resp = state.server.handle(&req).await;
        let entry = access_entry(&req, &resp, peer(), Instant::now());
        assert_eq!(entry.status, 206);
        assert_eq!(entry.content_encoding.as_deref(), Some("br"));
        assert_eq!(entry.content_range.as_deref(), Some("bytes 0-2/6"));
        assert_eq!(entry.body_bytes, 3);
        assert!(!entry.spa_fallback);

        let req = Request::get("/settings").body(()).unwrap();
        let resp = state.server.handle(&req).await;
        let entry = access_entry(&req, &resp, peer(), Instant::now());
        assert_eq!(entry.status, 200);
        assert!(entry.spa_fallback);
    }
}
