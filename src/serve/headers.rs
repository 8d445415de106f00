//! Header Builder
//!
//! Computes the header set for an asset from its logical name and stats.

use std::fs::Metadata;
use std::time::SystemTime;

use httpdate::fmt_http_date;
use hyper::header::{self, HeaderMap, HeaderName, HeaderValue};

use crate::http::cache::{generate_etag, CachePolicy};
use crate::http::mime::{content_encoding, get_content_type};

/// File stats captured when an asset is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetStats {
    /// On-disk byte size (the encoded size for precompressed variants)
    pub size: u64,
    pub modified: SystemTime,
}

impl AssetStats {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct HeaderBuilder {
    headers: HeaderMap,
}

impl HeaderBuilder {
    /// Inserts a header, or removes it when the value is empty or not a
    /// valid header value.
    pub(crate) fn insert(&mut self, name: HeaderName, value: &str) {
        match HeaderValue::from_str(value) {
            Ok(v) if !v.is_empty() => {
                self.headers.insert(name, v);
            }
            _ => {
                self.headers.remove(name);
            }
        }
    }

    pub(crate) fn content_type(&mut self, value: &str) {
        self.insert(header::CONTENT_TYPE, value);
    }

    pub(crate) fn content_length(&mut self, len: u64) {
        self.headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }

    pub(crate) fn last_modified(&mut self, modified: SystemTime) {
        self.insert(header::LAST_MODIFIED, &fmt_http_date(modified));
    }

    pub(crate) fn content_encoding(&mut self, token: &'static str) {
        self.headers
            .insert(header::CONTENT_ENCODING, HeaderValue::from_static(token));
    }

    pub(crate) fn etag(&mut self, value: &str) {
        self.insert(header::ETAG, value);
    }

    pub(crate) fn cache_control(&mut self, policy: CachePolicy) {
        self.insert(header::CACHE_CONTROL, &policy.to_header_value());
    }

    pub(crate) fn build(self) -> HeaderMap {
        self.headers
    }
}

/// Build the header set for a logical asset name
///
/// `name` keeps any `.br`/`.gz` suffix; it drives `Content-Encoding` and is
/// stripped before the content type lookup.
pub fn build_headers(
    name: &str,
    stats: &AssetStats,
    etag: bool,
    cache: Option<CachePolicy>,
) -> HeaderMap {
    let mut headers = HeaderBuilder::default();
    headers.content_length(stats.size);
    headers.content_type(&get_content_type(name));
    headers.last_modified(stats.modified);

    if let Some(token) = content_encoding(name) {
        headers.content_encoding(token);
    }
    if etag {
        headers.etag(&generate_etag(stats.size, stats.modified));
    }
    if let Some(policy) = cache {
        headers.cache_control(policy);
    }

    headers.build()
}
