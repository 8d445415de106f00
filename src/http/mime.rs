//! MIME type detection module
//!
//! Derives `Content-Type` and `Content-Encoding` from an asset's logical name.
//! Precompressed variants (`app.js.br`, `index.html.gz`) are typed by the name
//! they decompress to.

/// Compression suffixes and the `Content-Encoding` token each one maps to
const ENCODINGS: [(&str, &str); 2] = [(".br", "br"), (".gz", "gzip")];

/// `Content-Encoding` token for a precompressed asset name, if any
pub fn content_encoding(name: &str) -> Option<&'static str> {
    ENCODINGS
        .iter()
        .find(|(suffix, _)| name.ends_with(suffix))
        .map(|(_, token)| *token)
}

/// Remove a recognized compression suffix from an asset name
pub fn strip_encoding(name: &str) -> &str {
    ENCODINGS
        .iter()
        .find_map(|(suffix, _)| name.strip_suffix(suffix))
        .unwrap_or(name)
}

/// Get MIME Content-Type for an asset name
///
/// Unknown types yield an empty string; callers treat that as "no header".
///
/// # Examples
/// ```
/// use swan_serve::http::mime::get_content_type;
/// assert_eq!(get_content_type("/index.html"), "text/html;charset=utf-8");
/// assert_eq!(get_content_type("/style.css.br"), "text/css");
/// assert_eq!(get_content_type("/LICENSE"), "");
/// ```
pub fn get_content_type(name: &str) -> String {
    let base = strip_encoding(name);
    mime_guess::from_path(base)
        .first()
        .map_or_else(String::new, |mime| match mime.essence_str() {
            "text/html" => "text/html;charset=utf-8".to_string(),
            other => other.to_string(),
        })
}
