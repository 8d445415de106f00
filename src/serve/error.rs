use std::path::PathBuf;

use thiserror::Error;

/// Startup errors of the static asset engine. Request-time misses are not
/// errors and never show up here.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("served directory {path:?} is not usable: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to scan {path:?}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: jwalk::Error,
    },

    #[error("invalid ignore pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
