//! HTTP Range request parsing module
//!
//! Single byte-range parsing with lenient bounds: a missing start means 0,
//! a missing or unparsable end means the last byte, and an end past the
//! file is clamped.

/// Inclusive byte span validated against a file size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// Start byte position
    pub start: u64,
    /// End byte position (inclusive)
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes in the span
    #[inline]
    pub const fn len(self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value for this span
    pub fn content_range(self, file_size: u64) -> String {
        format!("bytes {}-{}/{file_size}", self.start, self.end)
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Valid range request
    Valid(ByteRange),
    /// Range not satisfiable (start >= `file_size`) - should return 416
    NotSatisfiable,
    /// No Range header, return full content
    None,
}

/// Parse HTTP Range header
///
/// Accepts `bytes=<start>-<end>` where either bound may be missing. Only the
/// leading digits of each bound are read, so `bytes=0-99,200-299` serves the
/// first span.
///
/// # Examples
/// ```
/// use swan_serve::http::range::{parse_range_header, ByteRange, RangeParseResult};
///
/// let result = parse_range_header(Some("bytes=200-299"), 1000);
/// assert_eq!(result, RangeParseResult::Valid(ByteRange { start: 200, end: 299 }));
///
/// let result = parse_range_header(Some("bytes=2000-"), 1000);
/// assert_eq!(result, RangeParseResult::NotSatisfiable);
/// ```
pub fn parse_range_header(range_header: Option<&str>, file_size: u64) -> RangeParseResult {
    let Some(header) = range_header else {
        return RangeParseResult::None;
    };

    let header = header.trim();
    let spec = header.strip_prefix("bytes=").unwrap_or(header);
    let (start_str, end_str) = spec.split_once('-').unwrap_or((spec, ""));

    let last = file_size.saturating_sub(1);
    let start = leading_number(start_str).unwrap_or(0);
    let end = leading_number(end_str).map_or(last, |e| e.min(last));

    if start >= file_size || start > end {
        return RangeParseResult::NotSatisfiable;
    }

    RangeParseResult::Valid(ByteRange { start, end })
}

/// Parse the leading decimal digits of a bound, saturating on overflow
fn leading_number(s: &str) -> Option<u64> {
    let s = s.trim_start();
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    Some(s[..digits].parse::<u64>().unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(start: u64, end: u64) -> RangeParseResult {
        RangeParseResult::Valid(ByteRange { start, end })
    }

    #[test]
    fn test_no_range() {
        assert_eq!(parse_range_header(None, 100), RangeParseResult::None);
    }

    #[test]
    fn test_standard_range() {
        assert_eq!(parse_range_header(Some("bytes=200-299"), 1000), valid(200, 299));
        match parse_range_header(Some("bytes=0-9"), 100) {
            RangeParseResult::Valid(r) => assert_eq!(r.len(), 10),
            other => panic!("Expected Valid, got {other:?}"),
        }
    }

    #[test]
    fn test_open_range() {
        assert_eq!(parse_range_header(Some("bytes=50-"), 100), valid(50, 99));
    }

    #[test]
    fn test_missing_start_defaults_to_zero() {
        assert_eq!(parse_range_header(Some("bytes=-20"), 100), valid(0, 20));
    }

    #[test]
    fn test_end_clamped() {
        assert_eq!(parse_range_header(Some("bytes=10-5000"), 100), valid(10, 99));
    }

    #[test]
    fn test_invalid_end_means_last_byte() {
        assert_eq!(parse_range_header(Some("bytes=10-abc"), 100), valid(10, 99));
    }

    #[test]
    fn test_zero_end_is_a_real_bound() {
        assert_eq!(parse_range_header(Some("bytes=0-0"), 100), valid(0, 0));
    }

    #[test]
    fn test_multi_range_uses_first_span() {
        assert_eq!(
            parse_range_header(Some("bytes=0-9,20-29"), 100),
            valid(0, 9)
        );
    }

    #[test]
    fn test_not_satisfiable() {
        assert_eq!(
            parse_range_header(Some("bytes=2000-"), 1000),
            RangeParseResult::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=1000-1000"), 1000),
            RangeParseResult::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=0-"), 0),
            RangeParseResult::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=99999999999999999999999-"), 10),
            RangeParseResult::NotSatisfiable
        );
    }

    #[test]
    fn test_reversed_bounds() {
        assert_eq!(
            parse_range_header(Some("bytes=50-10"), 100),
            RangeParseResult::NotSatisfiable
        );
    }

    #[test]
    fn test_content_range() {
        let r = ByteRange {
            start: 200,
            end: 299,
        };
        assert_eq!(r.content_range(1000), "bytes 200-299/1000");
        assert_eq!(r.len(), 100);
    }
}
