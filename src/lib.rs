//! swan-serve
//!
//! A static file server for local development: a production mode backed by a
//! startup index, a dev mode that probes the disk per request, precompressed
//! variants, weak validators, byte ranges and an SPA fallback.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod serve;
pub mod server;

pub use serve::{Options, StaticServer};
