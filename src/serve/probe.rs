//! Disk probe
//!
//! Dev mode resolves every request against the live filesystem so edits show
//! up without a restart. Candidates are joined under the served root and any
//! candidate that would escape it is treated as a miss.

use std::path::{Path, PathBuf};

use super::headers::{build_headers, AssetStats};
use super::index::AssetRecord;
use crate::http::cache::CachePolicy;

#[derive(Debug, Clone)]
pub struct DiskProbe {
    root: PathBuf,
    etag: bool,
}

impl DiskProbe {
    /// `root` must already be canonical
    pub fn new(root: PathBuf, etag: bool) -> Self {
        Self { root, etag }
    }

    /// First candidate that exists under the root as a regular file
    pub async fn lookup(&self, candidates: &[String]) -> Option<AssetRecord> {
        for candidate in candidates {
            let Some(abs_path) = contained_join(&self.root, candidate) else {
                tracing::debug!(%candidate, "candidate escapes served root");
                continue;
            };
            let Ok(metadata) = tokio::fs::metadata(&abs_path).await else {
                continue;
            };
            if metadata.is_dir() {
                continue;
            }

            let stats = AssetStats::from_metadata(&metadata);
            let headers = build_headers(
                candidate,
                &stats,
                self.etag,
                Some(CachePolicy::dev(self.etag)),
            );
            return Some(AssetRecord {
                abs_path,
                stats,
                headers,
            });
        }
        None
    }
}

/// Join a logical path under `root`, resolving `.` and `..` lexically
///
/// Returns `None` when the result would leave `root`.
pub fn contained_join(root: &Path, logical: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for segment in logical.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                if !path.pop() {
                    return None;
                }
            }
            part => path.push(part),
        }
    }
    path.starts_with(root).then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header;
    use std::fs;

    #[test]
    fn test_contained_join() {
        let root = Path::new("/srv/site");
        assert_eq!(
            contained_join(root, "/a/b.html"),
            Some(PathBuf::from("/srv/site/a/b.html"))
        );
        assert_eq!(
            contained_join(root, "/a/../b.html"),
            Some(PathBuf::from("/srv/site/b.html"))
        );
        assert_eq!(contained_join(root, "/../secret"), None);
        assert_eq!(contained_join(root, "/a/../../site2/x"), None);
        assert_eq!(contained_join(root, "/..\\..\\etc\\passwd"), None);
        assert_eq!(contained_join(root, "/"), Some(PathBuf::from("/srv/site")));
    }

    #[tokio::test]
    async fn test_lookup_reflects_disk() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let probe = DiskProbe::new(root.clone(), true);
        let candidates = vec!["/page.html".to_string(), "/page".to_string()];

        assert!(probe.lookup(&candidates).await.is_none());

        fs::write(root.join("page.html"), "v1").unwrap();
        let record = probe.lookup(&candidates).await.unwrap();
        assert_eq!(record.abs_path, root.join("page.html"));
        assert_eq!(record.stats.size, 2);
        assert_eq!(record.headers[header::CACHE_CONTROL], "no-cache");
        assert!(record.headers.contains_key(header::ETAG));
    }

    #[tokio::test]
    async fn test_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir(root.join("docs")).unwrap();
        fs::write(root.join("docs/index.html"), "docs").unwrap();

        let probe = DiskProbe::new(root.clone(), false);
        let candidates = vec!["/docs".to_string(), "/docs/index.html".to_string()];
        let record = probe.lookup(&candidates).await.unwrap();
        assert_eq!(record.abs_path, root.join("docs/index.html"));
        assert_eq!(record.headers[header::CACHE_CONTROL], "no-store");
    }

    #[tokio::test]
    async fn test_traversal_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        let root = base.join("public");
        fs::create_dir(&root).unwrap();
        fs::write(base.join("outside.txt"), "secret").unwrap();

        let probe = DiskProbe::new(root, false);
        assert!(probe
            .lookup(&["/../outside.txt".to_string()])
            .await
            .is_none());
    }
}
