//! Access log format module
//!
//! `combined` and `common` are predefined templates; any other string is
//! treated as a `$variable` template. `json` renders every field with
//! `serde_json`.
//!
//! Besides the usual request fields, an entry records how the static engine
//! answered: the encoded variant that was sent, the byte range and whether
//! the SPA shell stood in for the requested path.

use std::borrow::Cow;

use chrono::{DateTime, Local};
use serde_json::json;

const COMMON: &str = "$remote_addr - - [$time_local] \"$request\" $status $body_bytes_sent";
const COMBINED: &str = concat!(
    "$remote_addr - - [$time_local] \"$request\" $status $body_bytes_sent",
    " \"$http_referer\" \"$http_user_agent\""
);

/// One served request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    /// Request path as received, still percent-encoded
    pub path: String,
    /// Query string without the leading `?`
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    /// Response body size from `Content-Length`; 0 for HEAD and when unknown
    pub body_bytes: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub request_time_us: u64,
    /// `Content-Encoding` of the delivered variant (`br`, `gzip`)
    pub content_encoding: Option<String>,
    /// `Content-Range` of a 206 or 416
    pub content_range: Option<String>,
    /// The SPA shell was served in place of the requested path
    pub spa_fallback: bool,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
            content_encoding: None,
            content_range: None,
            spa_fallback: false,
        }
    }

    /// Render the entry as `combined`, `common`, `json` or a custom template
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.render(COMBINED),
            "common" => self.render(COMMON),
            "json" => self.format_json(),
            template => self.render(template),
        }
    }

    fn request_uri(&self) -> Cow<'_, str> {
        match &self.query {
            Some(q) => Cow::Owned(format!("{}?{q}", self.path)),
            None => Cow::Borrowed(&self.path),
        }
    }

    /// Value of a template variable; `None` leaves `$name` in the output
    ///
    /// Variables:
    /// - `$remote_addr`, `$time_local`, `$time_iso8601`
    /// - `$request` (`METHOD /uri HTTP/x`), `$request_method`, `$request_uri`
    /// - `$status`, `$body_bytes_sent`
    /// - `$http_referer`, `$http_user_agent`
    /// - `$request_time` (seconds, 3 decimals)
    /// - `$content_encoding`, `$content_range` (`-` when absent)
    /// - `$spa_fallback` (`1` or `0`)
    fn variable(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "remote_addr" => Cow::Borrowed(self.remote_addr.as_str()),
            "time_local" => Cow::Owned(self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string()),
            "time_iso8601" => Cow::Owned(self.time.to_rfc3339()),
            "request" => Cow::Owned(format!(
                "{} {} HTTP/{}",
                self.method,
                self.request_uri(),
                self.http_version
            )),
            "request_method" => Cow::Borrowed(self.method.as_str()),
            "request_uri" => self.request_uri(),
            "status" => Cow::Owned(self.status.to_string()),
            "body_bytes_sent" => Cow::Owned(self.body_bytes.to_string()),
            "http_referer" => or_dash(self.referer.as_deref()),
            "http_user_agent" => or_dash(self.user_agent.as_deref()),
            "request_time" => {
                #[allow(clippy::cast_precision_loss)]
                let secs = self.request_time_us as f64 / 1_000_000.0;
                Cow::Owned(format!("{secs:.3}"))
            }
            "content_encoding" => or_dash(self.content_encoding.as_deref()),
            "content_range" => or_dash(self.content_range.as_deref()),
            "spa_fallback" => Cow::Borrowed(if self.spa_fallback { "1" } else { "0" }),
            _ => return None,
        };
        Some(value)
    }

    /// Expand `$name` tokens; a name is the longest run of `[A-Za-z0-9_]`
    fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len() + 64);
        let mut rest = template;

        while let Some(at) = rest.find('$') {
            out.push_str(&rest[..at]);
            let after = &rest[at + 1..];
            let len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            let name = &after[..len];

            match self.variable(name) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push('$');
                    out.push_str(name);
                }
            }
            rest = &after[len..];
        }
        out.push_str(rest);
        out
    }

    fn format_json(&self) -> String {
        json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
            "content_encoding": self.content_encoding,
            "content_range": self.content_range,
            "spa_fallback": self.spa_fallback,
        })
        .to_string()
    }
}

fn or_dash(value: Option<&str>) -> Cow<'_, str> {
    Cow::Borrowed(value.unwrap_or("-"))
}
