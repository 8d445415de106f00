//! Static asset engine
//!
//! Resolves request paths to files under one root directory and delivers
//! them with validators, cache policy, encoding negotiation, byte ranges and
//! an optional single-page-application fallback.
//!
//! Two sources back the engine:
//! - production: an [`AssetIndex`] scanned once at construction
//! - dev: a [`DiskProbe`] that checks the filesystem on every request

pub mod context;
pub mod deliver;
pub mod error;
pub mod headers;
pub mod ignore;
pub mod index;
pub mod options;
pub mod probe;
pub mod resolve;

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::{Request, Response};

pub use context::RequestContext;
pub use error::ServeError;
pub use headers::AssetStats;
pub use index::{AssetIndex, AssetRecord};
pub use options::{Ignores, NoMatchHook, Options, SetHeadersHook, Single};

use crate::http::cache::check_etag_match;
use crate::http::{build_304_response, build_404_response, ServeBody};
use ignore::IgnoreSet;
use probe::DiskProbe;
use resolve::{candidates, Negotiator};

/// Where resolved assets come from
#[derive(Debug)]
enum AssetSource {
    Indexed(AssetIndex),
    Disk(DiskProbe),
}

/// Response extension marking a request answered with the SPA shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaFallback;

/// Result of [`StaticServer::serve`]
pub enum Outcome {
    Served(Response<ServeBody>),
    /// Neither the path nor the SPA fallback resolved; the caller decides
    NoMatch,
}

/// Static asset handler bound to one root directory
#[derive(Debug)]
pub struct StaticServer {
    root: PathBuf,
    options: Options,
    negotiator: Negotiator,
    ignores: IgnoreSet,
    fallback: Option<String>,
    source: AssetSource,
}

impl StaticServer {
    /// Build a handler for `root`
    ///
    /// In production mode the whole tree is scanned here, so construction
    /// cost grows with the number of files and request cost does not.
    pub fn new(root: impl AsRef<Path>, options: Options) -> Result<Self, ServeError> {
        let given = root.as_ref();
        let root = given.canonicalize().map_err(|source| ServeError::Root {
            path: given.to_path_buf(),
            source,
        })?;
        if !root.is_dir() {
            return Err(ServeError::Root {
                path: given.to_path_buf(),
                source: std::io::Error::other("not a directory"),
            });
        }

        let negotiator = Negotiator::new(&options.extensions, options.gzip, options.brotli);
        let ignores = IgnoreSet::new(&options.ignores, options.dotfiles)?;
        let fallback = options.single.fallback_path();
        let source = if options.dev {
            AssetSource::Disk(DiskProbe::new(root.clone(), options.etag))
        } else {
            AssetSource::Indexed(AssetIndex::scan(&root, &options)?)
        };

        tracing::debug!(
            root = %root.display(),
            dev = options.dev,
            ignore_patterns = ignores.len(),
            fallback = ?fallback,
            "static server ready"
        );

        Ok(Self {
            root,
            options,
            negotiator,
            ignores,
            fallback,
            source,
        })
    }

    /// Canonical served directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Number of indexed assets; `None` in dev mode
    pub fn asset_count(&self) -> Option<usize> {
        match &self.source {
            AssetSource::Indexed(index) => Some(index.len()),
            AssetSource::Disk(_) => None,
        }
    }

    async fn lookup(&self, pathname: &str, accept_encoding: &str) -> Option<Cow<'_, AssetRecord>> {
        let list = candidates(pathname, &self.negotiator.suffixes(accept_encoding));
        match &self.source {
            AssetSource::Indexed(index) => index.lookup(&list).map(Cow::Borrowed),
            AssetSource::Disk(probe) => probe.lookup(&list).await.map(Cow::Owned),
        }
    }

    /// Resolve the request to an asset, applying the SPA fallback on a miss
    pub async fn resolve(&self, ctx: &RequestContext<'_>) -> Option<Cow<'_, AssetRecord>> {
        self.locate(ctx).await.map(|(asset, _)| asset)
    }

    /// Like [`resolve`](Self::resolve), also reporting whether the SPA shell
    /// stood in for the requested path
    async fn locate(&self, ctx: &RequestContext<'_>) -> Option<(Cow<'_, AssetRecord>, bool)> {
        let accept = ctx.header(&header::ACCEPT_ENCODING).unwrap_or("");
        if let Some(asset) = self.lookup(&ctx.decoded, accept).await {
            return Some((asset, false));
        }

        let fallback = self.fallback.as_deref()?;
        if self.ignores.is_match(ctx.pathname) {
            return None;
        }
        tracing::debug!(path = %ctx.pathname, %fallback, "falling back to SPA shell");
        self.lookup(fallback, accept).await.map(|asset| (asset, true))
    }

    /// Serve the request on top of `outgoing` headers
    ///
    /// Headers already in `outgoing` take precedence over computed ones.
    /// Responses that came from the SPA shell carry a [`SpaFallback`]
    /// extension.
    pub async fn serve(&self, ctx: &RequestContext<'_>, outgoing: HeaderMap) -> Outcome {
        let Some((asset, fallback)) = self.locate(ctx).await else {
            return Outcome::NoMatch;
        };

        let mut response = self.serve_asset(ctx, &asset, outgoing).await;
        if fallback {
            response.extensions_mut().insert(SpaFallback);
        }
        Outcome::Served(response)
    }

    async fn serve_asset(
        &self,
        ctx: &RequestContext<'_>,
        asset: &AssetRecord,
        mut outgoing: HeaderMap,
    ) -> Response<ServeBody> {
        if self.options.etag {
            let etag = asset.headers.get(header::ETAG).and_then(|v| v.to_str().ok());
            if let Some(etag) = etag {
                if check_etag_match(ctx.header(&header::IF_NONE_MATCH), etag) {
                    return build_304_response(outgoing);
                }
            }
        }

        if self.negotiator.varies() {
            outgoing.insert(header::VARY, HeaderValue::from_static("Accept-Encoding"));
        }
        if let Some(hook) = &self.options.set_headers {
            hook(&mut outgoing, ctx.decoded.as_ref(), &asset.stats);
        }

        let range = ctx.header(&header::RANGE);
        deliver::deliver(asset, outgoing, range, ctx.is_head).await
    }

    /// Serve the request, turning a miss into the no-match hook or a 404
    pub async fn respond(&self, ctx: &RequestContext<'_>, outgoing: HeaderMap) -> Response<ServeBody> {
        match self.serve(ctx, outgoing).await {
            Outcome::Served(response) => response,
            Outcome::NoMatch => match &self.options.on_no_match {
                Some(hook) => hook(ctx),
                None => build_404_response(),
            },
        }
    }

    /// Convenience entry point for a bare request
    pub async fn handle<B>(&self, req: &Request<B>) -> Response<ServeBody> {
        let ctx = RequestContext::new(req);
        self.respond(&ctx, HeaderMap::new()).await
    }
}
