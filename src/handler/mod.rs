//! Request handler module
//!
//! Responsible for request routing dispatch. Every GET/HEAD request goes to
//! the static asset engine.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
