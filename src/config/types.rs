// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

use crate::serve::{Ignores, Options, Single};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(rename = "static")]
    pub static_files: StaticConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    /// Seconds a client may take to send request headers; 0 disables it.
    /// Response bodies are not timed out.
    pub read_timeout: u64,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
}

/// Static asset configuration (`[static]` table)
#[derive(Debug, Deserialize, Clone)]
pub struct StaticConfig {
    /// Served directory
    pub root: String,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub gzip: bool,
    #[serde(default)]
    pub brotli: bool,
    #[serde(default)]
    pub etag: bool,
    #[serde(default)]
    pub single: SingleSetting,
    #[serde(default)]
    pub ignores: IgnoresSetting,
    #[serde(default)]
    pub max_age: Option<u64>,
    #[serde(default)]
    pub immutable: bool,
    #[serde(default)]
    pub dotfiles: bool,
    #[serde(default)]
    pub dev: bool,
}

fn default_extensions() -> Vec<String> {
    vec!["html".to_string(), "htm".to_string()]
}

/// `single = true` or `single = "200.html"`
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum SingleSetting {
    Flag(bool),
    Target(String),
}

impl Default for SingleSetting {
    fn default() -> Self {
        Self::Flag(false)
    }
}

impl From<&SingleSetting> for Single {
    fn from(setting: &SingleSetting) -> Self {
        match setting {
            SingleSetting::Flag(false) => Self::Disabled,
            SingleSetting::Flag(true) => Self::Root,
            SingleSetting::Target(target) => Self::Target(target.clone()),
        }
    }
}

/// `ignores = false`, `ignores = "^/api"` or `ignores = ["^/api", "^/ws"]`
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum IgnoresSetting {
    Flag(bool),
    Pattern(String),
    Patterns(Vec<String>),
}

impl Default for IgnoresSetting {
    fn default() -> Self {
        Self::Flag(true)
    }
}

impl From<&IgnoresSetting> for Ignores {
    fn from(setting: &IgnoresSetting) -> Self {
        match setting {
            IgnoresSetting::Flag(false) => Self::Disabled,
            IgnoresSetting::Flag(true) => Self::Patterns(Vec::new()),
            IgnoresSetting::Pattern(pattern) => Self::Patterns(vec![pattern.clone()]),
            IgnoresSetting::Patterns(patterns) => Self::Patterns(patterns.clone()),
        }
    }
}

impl StaticConfig {
    /// Engine options for this section; hooks are left unset
    pub fn to_options(&self) -> Options {
        Options {
            extensions: self
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
            gzip: self.gzip,
            brotli: self.brotli,
            etag: self.etag,
            single: Single::from(&self.single),
            ignores: Ignores::from(&self.ignores),
            max_age: self.max_age,
            immutable: self.immutable,
            dotfiles: self.dotfiles,
            dev: self.dev,
            ..Options::default()
        }
    }
}
