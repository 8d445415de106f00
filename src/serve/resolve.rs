//! Path resolution and encoding negotiation
//!
//! A logical URL path expands into an ordered list of candidate keys; the
//! first one that exists wins. Order: brotli variants, gzip variants, the
//! configured extensions, then the literal path, each followed by its
//! `/index` form.

/// Precomputed suffix groups for one server
#[derive(Debug, Clone)]
pub struct Negotiator {
    brotli: Option<Vec<String>>,
    gzip: Option<Vec<String>>,
    plain: Vec<String>,
}

impl Negotiator {
    pub fn new(extensions: &[String], gzip: bool, brotli: bool) -> Self {
        let compressed = |suffix: &str| {
            extensions
                .iter()
                .map(|ext| format!("{ext}.{suffix}"))
                .chain(std::iter::once(suffix.to_string()))
                .collect::<Vec<_>>()
        };

        let mut plain = extensions.to_vec();
        plain.push(String::new());

        Self {
            brotli: brotli.then(|| compressed("br")),
            gzip: gzip.then(|| compressed("gz")),
            plain,
        }
    }

    /// Whether responses depend on `Accept-Encoding`
    pub const fn varies(&self) -> bool {
        self.brotli.is_some() || self.gzip.is_some()
    }

    /// Suffixes to probe for a request with this `Accept-Encoding` value
    pub fn suffixes(&self, accept_encoding: &str) -> Vec<&str> {
        let mut out = Vec::new();
        if let Some(brotli) = &self.brotli {
            if accepts_brotli(accept_encoding) {
                out.extend(brotli.iter().map(String::as_str));
            }
        }
        if let Some(gzip) = &self.gzip {
            if accepts_gzip(accept_encoding) {
                out.extend(gzip.iter().map(String::as_str));
            }
        }
        out.extend(self.plain.iter().map(String::as_str));
        out
    }
}

/// Case-insensitive substring match; `brotli` contains `br`
pub fn accepts_brotli(accept_encoding: &str) -> bool {
    accept_encoding.to_ascii_lowercase().contains("br")
}

pub fn accepts_gzip(accept_encoding: &str) -> bool {
    accept_encoding.to_ascii_lowercase().contains("gzip")
}

/// Expand a logical path into candidate keys
///
/// One trailing slash is stripped first, so `/docs/` and `/docs` probe the
/// same keys. The root path only probes `/index` forms.
///
/// # Examples
/// ```
/// use swan_serve::serve::resolve::candidates;
///
/// assert_eq!(
///     candidates("/about", &["html", ""]),
///     ["/about.html", "/about/index.html", "/about", "/about/index"]
/// );
/// ```
pub fn candidates(pathname: &str, suffixes: &[&str]) -> Vec<String> {
    let uri = pathname.strip_suffix('/').unwrap_or(pathname);
    let mut out = Vec::with_capacity(suffixes.len() * 2);
    for suffix in suffixes {
        let ext = if suffix.is_empty() {
            String::new()
        } else {
            format!(".{suffix}")
        };
        if !uri.is_empty() {
            out.push(format!("{uri}{ext}"));
        }
        out.push(format!("{uri}/index{ext}"));
    }
    out
}
