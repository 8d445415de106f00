//! Asset Index
//!
//! Production mode walks the served directory once at startup and keeps an
//! immutable table of logical path -> [`AssetRecord`]. Lookups are hash hits
//! per candidate, independent of the number of assets.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use hyper::header::HeaderMap;
use jwalk::WalkDir;

use super::error::ServeError;
use super::headers::{build_headers, AssetStats};
use super::options::Options;
use crate::http::cache::CachePolicy;
use crate::logger;

/// A resolved asset: where it lives, its stats and its computed headers
#[derive(Debug, Clone)]
pub struct AssetRecord {
    pub abs_path: PathBuf,
    pub stats: AssetStats,
    pub headers: HeaderMap,
}

/// Read-only table built once per server lifetime
#[derive(Debug, Default)]
pub struct AssetIndex {
    files: HashMap<String, AssetRecord>,
}

impl AssetIndex {
    /// Walk `root` and record every regular file
    ///
    /// Dotfiles (and anything under a dot-directory) are skipped unless
    /// `options.dotfiles` is set; `.well-known/` paths are always kept.
    /// A walk error is fatal: the server cannot start without its index.
    pub fn scan(root: &Path, options: &Options) -> Result<Self, ServeError> {
        let started = Instant::now();
        let cache = CachePolicy::production(options.max_age, options.immutable);
        let mut files = HashMap::new();

        for entry in WalkDir::new(root).skip_hidden(false).sort(true) {
            let entry = entry.map_err(|source| ServeError::Scan {
                path: root.to_path_buf(),
                source,
            })?;
            if entry.file_type().is_dir() {
                continue;
            }

            let abs_path = entry.path();
            let Some(key) = logical_key(root, &abs_path) else {
                continue;
            };
            if !options.dotfiles && is_hidden(&key) {
                tracing::trace!(%key, "skipping dotfile");
                continue;
            }

            // Follows symlinks; broken links are skipped rather than fatal
            let metadata = match std::fs::metadata(&abs_path) {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    logger::log_warning(&format!(
                        "Skipping unreadable asset '{}': {e}",
                        abs_path.display()
                    ));
                    continue;
                }
            };

            let stats = AssetStats::from_metadata(&metadata);
            let headers = build_headers(&key, &stats, options.etag, cache);
            files.insert(
                key,
                AssetRecord {
                    abs_path,
                    stats,
                    headers,
                },
            );
        }

        tracing::info!(
            assets = files.len(),
            elapsed = ?started.elapsed(),
            root = %root.display(),
            "asset index built"
        );

        Ok(Self { files })
    }

    pub fn get(&self, key: &str) -> Option<&AssetRecord> {
        self.files.get(key)
    }

    /// First candidate present in the index
    pub fn lookup(&self, candidates: &[String]) -> Option<&AssetRecord> {
        candidates.iter().find_map(|c| self.files.get(c))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// `/` + path relative to `root`, with `/` separators
fn logical_key(root: &Path, abs_path: &Path) -> Option<String> {
    let rel = abs_path.strip_prefix(root).ok()?;
    let mut key = String::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            key.push('/');
            key.push_str(part.to_str()?);
        }
    }
    (!key.is_empty()).then_some(key)
}

/// Dot-prefixed file or directory anywhere in the key, outside `.well-known/`
fn is_hidden(key: &str) -> bool {
    !key.contains("/.well-known/") && key.contains("/.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header;
    use std::fs;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("about")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join(".well-known")).unwrap();
        fs::write(root.join("index.html"), "<h1>home</h1>").unwrap();
        fs::write(root.join("about/index.html"), "about").unwrap();
        fs::write(root.join(".env"), "SECRET=1").unwrap();
        fs::write(root.join(".git/config"), "[core]").unwrap();
        fs::write(root.join(".well-known/security.txt"), "contact").unwrap();
        dir
    }

    #[test]
    fn test_scan_keys() {
        let dir = site();
        let root = dir.path().canonicalize().unwrap();
        let index = AssetIndex::scan(&root, &Options::default()).unwrap();

        assert!(index.get("/index.html").is_some());
        assert!(index.get("/about/index.html").is_some());
        assert!(index.get("/.well-known/security.txt").is_some());
        assert!(index.get("/.env").is_none());
        assert!(index.get("/.git/config").is_none());
        assert!(index.get("/about").is_none());
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_scan_with_dotfiles() {
        let dir = site();
        let root = dir.path().canonicalize().unwrap();
        let options = Options {
            dotfiles: true,
            ..Options::default()
        };
        let index = AssetIndex::scan(&root, &options).unwrap();
        assert!(index.get("/.env").is_some());
        assert!(index.get("/.git/config").is_some());
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn test_records_carry_headers() {
        let dir = site();
        let root = dir.path().canonicalize().unwrap();
        let options = Options {
            etag: true,
            max_age: Some(60),
            immutable: true,
            ..Options::default()
        };
        let index = AssetIndex::scan(&root, &options).unwrap();
        let record = index.get("/index.html").unwrap();

        assert_eq!(record.stats.size, 13);
        assert_eq!(record.abs_path, root.join("index.html"));
        assert_eq!(record.headers[header::CONTENT_LENGTH], "13");
        assert_eq!(
            record.headers[header::CACHE_CONTROL],
            "public,max-age=60,immutable"
        );
        assert!(record.headers.contains_key(header::ETAG));
    }

    #[test]
    fn test_lookup_first_match_wins() {
        let dir = site();
        let root = dir.path().canonicalize().unwrap();
        let index = AssetIndex::scan(&root, &Options::default()).unwrap();
        let candidates = vec![
            "/about.html".to_string(),
            "/about/index.html".to_string(),
            "/index.html".to_string(),
        ];
        let record = index.lookup(&candidates).unwrap();
        assert_eq!(record.abs_path, root.join("about/index.html"));
        assert!(index.lookup(&["/nope".to_string()]).is_none());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            AssetIndex::scan(&missing, &Options::default()),
            Err(ServeError::Scan { .. })
        ));
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden("/.env"));
        assert!(is_hidden("/a/.cache/b.js"));
        assert!(!is_hidden("/.well-known/x"));
        assert!(!is_hidden("/a/b.c.js"));
    }
}
