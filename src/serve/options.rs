//! Engine options
//!
//! Immutable per-server configuration plus optional hooks. A missing hook
//! means the default behavior: 404 on no match, no header decoration.

use std::fmt;
use std::sync::Arc;

use hyper::header::HeaderMap;
use hyper::Response;

use super::context::RequestContext;
use super::headers::AssetStats;
use crate::http::ServeBody;

/// Invoked when neither the request path nor the SPA fallback resolves
pub type NoMatchHook = Arc<dyn Fn(&RequestContext<'_>) -> Response<ServeBody> + Send + Sync>;

/// Invoked with (response headers, decoded pathname, stats) before computed
/// headers are merged in
pub type SetHeadersHook = Arc<dyn Fn(&mut HeaderMap, &str, &AssetStats) + Send + Sync>;

/// Single-page application mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Single {
    #[default]
    Disabled,
    /// Fall back to the root index
    Root,
    /// Fall back to the named asset, e.g. `index.html` or `200.html`
    Target(String),
}

impl Single {
    /// Logical path re-resolved on a non-ignored miss
    ///
    /// The target's extension is dropped so that the regular extension and
    /// encoding candidates apply to it.
    pub fn fallback_path(&self) -> Option<String> {
        match self {
            Self::Disabled => None,
            Self::Root => Some("/".to_string()),
            Self::Target(target) => {
                let target = target.trim_start_matches('/');
                let stem = target.rfind('.').map_or(target, |idx| &target[..idx]);
                Some(format!("/{stem}"))
            }
        }
    }
}

/// SPA ignore patterns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ignores {
    /// No ignore predicates at all, defaults included
    Disabled,
    /// Default predicates plus these case-insensitive user patterns
    Patterns(Vec<String>),
}

impl Default for Ignores {
    fn default() -> Self {
        Self::Patterns(Vec::new())
    }
}

/// Static asset engine options
#[derive(Clone)]
pub struct Options {
    /// Fallback extensions without the leading dot
    pub extensions: Vec<String>,
    pub gzip: bool,
    pub brotli: bool,
    pub etag: bool,
    pub single: Single,
    pub ignores: Ignores,
    /// `Cache-Control` max-age in seconds; `None` omits the header
    pub max_age: Option<u64>,
    pub immutable: bool,
    pub dotfiles: bool,
    /// Probe the filesystem per request instead of scanning at startup
    pub dev: bool,
    pub on_no_match: Option<NoMatchHook>,
    pub set_headers: Option<SetHeadersHook>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            extensions: vec!["html".to_string(), "htm".to_string()],
            gzip: false,
            brotli: false,
            etag: false,
            single: Single::Disabled,
            ignores: Ignores::default(),
            max_age: None,
            immutable: false,
            dotfiles: false,
            dev: false,
            on_no_match: None,
            set_headers: None,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("extensions", &self.extensions)
            .field("gzip", &self.gzip)
            .field("brotli", &self.brotli)
            .field("etag", &self.etag)
            .field("single", &self.single)
            .field("ignores", &self.ignores)
            .field("max_age", &self.max_age)
            .field("immutable", &self.immutable)
            .field("dotfiles", &self.dotfiles)
            .field("dev", &self.dev)
            .field("on_no_match", &self.on_no_match.is_some())
            .field("set_headers", &self.set_headers.is_some())
            .finish()
    }
}
