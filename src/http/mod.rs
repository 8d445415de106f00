//! HTTP protocol layer module
//!
//! Protocol-level helpers shared by the static asset engine and the request
//! router: validators, content types, byte ranges, bodies and status responses.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;
pub mod stream;

// Re-export commonly used types
pub use range::parse_range_header;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_416_response,
    build_500_response, build_options_response, ServeBody,
};
