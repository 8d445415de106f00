// Application state module
// Shared, read-only state handed to every connection

use std::sync::Arc;

use hyper::header::HeaderValue;

use super::types::Config;
use crate::serve::{ServeError, StaticServer};

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub server: StaticServer,
    /// Pre-encoded `Server` header, `None` when the configured name is not
    /// a valid header value
    pub server_header: Option<HeaderValue>,
}

impl AppState {
    /// Build the static engine for the configured root
    ///
    /// In production mode this scans the whole directory, so it runs before
    /// the listener is bound.
    pub fn new(config: &Config) -> Result<Arc<Self>, ServeError> {
        let server = StaticServer::new(&config.static_files.root, config.static_options())?;
        let server_header = HeaderValue::from_str(&config.http.server_name).ok();

        Ok(Arc::new(Self {
            config: config.clone(),
            server,
            server_header,
        }))
    }
}
