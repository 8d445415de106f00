//! Request-scoped context
//!
//! The request URL is parsed once at the entry point and the result is passed
//! down the call chain. Nothing is cached on the request itself.

use std::borrow::Cow;

use hyper::header::{HeaderMap, HeaderName};
use hyper::{Method, Request, Uri};
use percent_encoding::percent_decode_str;

/// Request information needed for static asset resolution and delivery
#[derive(Debug)]
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub uri: &'a Uri,
    pub headers: &'a HeaderMap,
    /// URL path as received (query string excluded, still percent-encoded)
    pub pathname: &'a str,
    /// Percent-decoded pathname, or `pathname` itself when decoding fails
    pub decoded: Cow<'a, str>,
    pub is_head: bool,
}

impl<'a> RequestContext<'a> {
    pub fn new<B>(req: &'a Request<B>) -> Self {
        let pathname = req.uri().path();
        Self {
            method: req.method(),
            uri: req.uri(),
            headers: req.headers(),
            pathname,
            decoded: decode_pathname(pathname),
            is_head: req.method() == Method::HEAD,
        }
    }

    /// Header value as `&str`, ignoring values that are not visible ASCII
    pub fn header(&self, name: &HeaderName) -> Option<&'a str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Percent-decode a pathname
///
/// Malformed escapes (`%zz`, a truncated `%4`) and escapes that decode to
/// invalid UTF-8 are treated as a decode failure, and the original is kept.
pub fn decode_pathname(pathname: &str) -> Cow<'_, str> {
    if !pathname.contains('%') || !has_well_formed_escapes(pathname) {
        return Cow::Borrowed(pathname);
    }
    percent_decode_str(pathname)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(pathname))
}

fn has_well_formed_escapes(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3);
            if !hex.is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit)) {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path_is_borrowed() {
        assert!(matches!(decode_pathname("/about"), Cow::Borrowed("/about")));
    }

    #[test]
    fn test_decodes_escapes() {
        assert_eq!(decode_pathname("/hello%20world.html"), "/hello world.html");
        assert_eq!(decode_pathname("/caf%C3%A9"), "/café");
    }

    #[test]
    fn test_malformed_escape_keeps_original() {
        assert_eq!(decode_pathname("/100%zz"), "/100%zz");
        assert_eq!(decode_pathname("/trailing%4"), "/trailing%4");
        assert_eq!(decode_pathname("/bad%FF"), "/bad%FF");
    }

    #[test]
    fn test_context_strips_query() {
        let req = Request::get("/docs/a%20b?x=1").body(()).unwrap();
        let ctx = RequestContext::new(&req);
        assert_eq!(ctx.pathname, "/docs/a%20b");
        assert_eq!(ctx.decoded, "/docs/a b");
        assert!(!ctx.is_head);
    }

    #[test]
    fn test_context_head() {
        let req = Request::head("/").body(()).unwrap();
        assert!(RequestContext::new(&req).is_head);
    }
}
