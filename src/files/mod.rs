//! File serving core
//!
//! This module implements the request-dispatch and content-rendering
//! pipeline: path resolution, directory listings, Markdown rendering,
//! and chunked file streaming.

pub mod handler;
pub mod listing;
pub mod markdown;
pub mod page;
pub mod resolve;
pub mod stream;

pub use handler::FileHandler;
pub use resolve::{Entry, ResolvedTarget};
pub use stream::FileStream;
