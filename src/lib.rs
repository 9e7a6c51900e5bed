//! mdserve - Markdown-aware static file server
//!
//! Core library: HTTP layer, path resolution, and content rendering.

pub mod config;
pub mod files;
pub mod http;
pub mod server;
