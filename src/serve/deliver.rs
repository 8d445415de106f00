//! Delivery
//!
//! Turns a resolved asset plus the outgoing header set into a response:
//! full content, a single byte range, or 416.

use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::{Response, StatusCode};

use super::index::AssetRecord;
use crate::http::range::{parse_range_header, RangeParseResult};
use crate::http::response::{build_416_response, build_500_response, build_response, empty_body};
use crate::http::stream::file_body;
use crate::http::ServeBody;
use crate::logger;

/// Merge computed asset headers into the outgoing set
///
/// A header already present on the outgoing set is left untouched.
pub fn merge_headers(outgoing: &mut HeaderMap, computed: &HeaderMap) {
    for (name, value) in computed {
        if !outgoing.contains_key(name) {
            outgoing.insert(name.clone(), value.clone());
        }
    }
}

/// Deliver `asset` on top of the `outgoing` header set
///
/// `range` is the raw `Range` request header. HEAD requests get the same
/// status and headers with an empty body, and the file is never opened.
pub async fn deliver(
    asset: &AssetRecord,
    outgoing: HeaderMap,
    range: Option<&str>,
    is_head: bool,
) -> Response<ServeBody> {
    let size = asset.stats.size;
    let span = match parse_range_header(range, size) {
        RangeParseResult::None => None,
        RangeParseResult::Valid(span) => Some(span),
        // Asset headers are not merged into a 416
        RangeParseResult::NotSatisfiable => return build_416_response(outgoing, size),
    };

    let mut headers = outgoing;
    merge_headers(&mut headers, &asset.headers);

    let (status, start, len) = match span {
        None => (StatusCode::OK, 0, size),
        Some(span) => {
            if let Ok(value) = HeaderValue::from_str(&span.content_range(size)) {
                headers.insert(header::CONTENT_RANGE, value);
            }
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(span.len()));
            headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
            (StatusCode::PARTIAL_CONTENT, span.start, span.len())
        }
    };

    if is_head {
        return build_response(status, headers, empty_body());
    }

    match file_body(&asset.abs_path, start, len).await {
        Ok(body) => build_response(status, headers, body),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to open '{}': {e}",
                asset.abs_path.display()
            ));
            build_500_response()
        }
    }
}
