//! HTTP cache control module
//!
//! Provides weak `ETag` generation, conditional request handling and
//! `Cache-Control` directives.

use std::time::SystemTime;

/// Milliseconds since the Unix epoch (pre-epoch times clamp to zero)
pub fn mtime_millis(modified: SystemTime) -> u128 {
    modified
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

/// Generate a weak `ETag` from file size and modification time
///
/// Format: `W/"<size>-<mtime millis>"`. This is not a content hash, so a
/// rewrite that keeps both size and mtime is not detected.
///
/// # Examples
/// ```
/// use std::time::{Duration, SystemTime};
/// use swan_serve::http::cache::generate_etag;
///
/// let mtime = SystemTime::UNIX_EPOCH + Duration::from_millis(1000);
/// assert_eq!(generate_etag(42, mtime), "W/\"42-1000\"");
/// ```
pub fn generate_etag(size: u64, modified: SystemTime) -> String {
    format!("W/\"{size}-{}\"", mtime_millis(modified))
}

/// Check if client's `If-None-Match` header matches the asset's `ETag`
///
/// Comparison is exact: the header must carry the same validator string,
/// including the `W/` prefix. Lists and `*` are not interpreted.
///
/// # Returns
/// Returns true if matched (should return 304), false otherwise
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| client_etag == etag)
}

/// Cache control policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Public cache with max-age (seconds), optionally immutable
    Public { max_age: u64, immutable: bool },
    /// Revalidate on every use (dev mode with etags)
    NoCache,
    /// Never store (dev mode without etags)
    NoStore,
}

impl CachePolicy {
    /// Policy for indexed assets. `None` when no max-age was configured.
    pub const fn production(max_age: Option<u64>, immutable: bool) -> Option<Self> {
        match max_age {
            Some(max_age) => Some(Self::Public { max_age, immutable }),
            None => None,
        }
    }

    /// Policy for assets probed from disk on every request
    pub const fn dev(etag: bool) -> Self {
        if etag {
            Self::NoCache
        } else {
            Self::NoStore
        }
    }

    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Public {
                max_age,
                immutable: true,
            } => format!("public,max-age={max_age},immutable"),
            Self::Public {
                max_age: 0,
                immutable: false,
            } => "public,max-age=0,must-revalidate".to_string(),
            Self::Public { max_age, .. } => format!("public,max-age={max_age}"),
            Self::NoCache => "no-cache".to_string(),
            Self::NoStore => "no-store".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_generate_etag() {
        let mtime = SystemTime::UNIX_EPOCH + Duration::from_millis(1000);
        assert_eq!(generate_etag(42, mtime), "W/\"42-1000\"");
    }

    #[test]
    fn test_etag_uses_millis() {
        let mtime = SystemTime::UNIX_EPOCH + Duration::new(1_700_000_000, 123_000_000);
        assert_eq!(generate_etag(7, mtime), "W/\"7-1700000000123\"");
    }

    #[test]
    fn test_pre_epoch_clamps() {
        let mtime = SystemTime::UNIX_EPOCH - Duration::from_secs(5);
        assert_eq!(mtime_millis(mtime), 0);
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "W/\"42-1000\"";
        assert!(check_etag_match(Some("W/\"42-1000\""), etag));
        assert!(!check_etag_match(Some("\"42-1000\""), etag));
        assert!(!check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("W/\"x\", W/\"42-1000\""), etag));
        assert!(!check_etag_match(None, etag));
    }

    #[test]
    fn test_cache_policy() {
        assert_eq!(
            CachePolicy::Public {
                max_age: 3600,
                immutable: false
            }
            .to_header_value(),
            "public,max-age=3600"
        );
        assert_eq!(
            CachePolicy::Public {
                max_age: 31_536_000,
                immutable: true
            }
            .to_header_value(),
            "public,max-age=31536000,immutable"
        );
        assert_eq!(
            CachePolicy::Public {
                max_age: 0,
                immutable: false
            }
            .to_header_value(),
            "public,max-age=0,must-revalidate"
        );
        assert_eq!(CachePolicy::NoCache.to_header_value(), "no-cache");
        assert_eq!(CachePolicy::NoStore.to_header_value(), "no-store");
    }

    #[test]
    fn test_policy_selection() {
        assert_eq!(CachePolicy::production(None, true), None);
        assert_eq!(
            CachePolicy::production(Some(0), true),
            Some(CachePolicy::Public {
                max_age: 0,
                immutable: true
            })
        );
        assert_eq!(CachePolicy::dev(true), CachePolicy::NoCache);
        assert_eq!(CachePolicy::dev(false), CachePolicy::NoStore);
    }
}
