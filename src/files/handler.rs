//! Request dispatching.
//!
//! The [`FileHandler`] is the orchestrator: it takes a parsed request,
//! consults the path resolver, and routes to the directory renderer, the
//! Markdown renderer, or the file streamer. Every outcome, including an
//! unexpected I/O failure, becomes a well-formed response; nothing
//! propagates uncaught to the connection layer.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::fs;

use crate::files::page::{encode_href_segment, escape_html, render_page};
use crate::files::resolve::{self, ResolvedTarget};
use crate::files::stream::FileStream;
use crate::files::{listing, markdown};
use crate::http::mime;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};

/// Dispatches requests against one immutable served root.
///
/// The root is passed in explicitly at construction (never read from
/// ambient process state), so a handler can be built over any directory
/// in tests. It is canonicalized once and read-only afterwards.
pub struct FileHandler {
    root: PathBuf,
}

impl FileHandler {
    /// Creates a handler over the given served root.
    ///
    /// Fails if the root does not exist or cannot be canonicalized.
    pub fn new(root: impl AsRef<Path>) -> anyhow::Result<Self> {
        let root = root
            .as_ref()
            .canonicalize()
            .with_context(|| format!("served root {} is not accessible", root.as_ref().display()))?;

        Ok(Self { root })
    }

    /// The canonical served root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Produces the response for one request.
    ///
    /// This function never fails: expected misses become 404, unsupported
    /// methods 405, and unexpected filesystem errors 500. A single bad
    /// request can therefore never take down the listening process.
    pub async fn dispatch(&self, request: &Request) -> Response {
        // Read-only server: reject anything but GET/HEAD before touching
        // the filesystem.
        if !matches!(request.method, Method::GET | Method::HEAD) {
            tracing::debug!(method = ?request.method, path = %request.path, "method not allowed");
            return Response::method_not_allowed();
        }

        match self.dispatch_inner(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(path = %request.path, error = %e, "request failed");
                Response::internal_error()
            }
        }
    }

    async fn dispatch_inner(&self, request: &Request) -> io::Result<Response> {
        match resolve::resolve(&self.root, &request.path).await? {
            ResolvedTarget::NotFound => {
                tracing::debug!(path = %request.path, "not found");
                Ok(Response::not_found())
            }

            ResolvedTarget::Directory { entries, .. } => {
                // Listings use relative hrefs, so directory URLs must end
                // in a slash for those links to resolve.
                if !request.path.ends_with('/') {
                    return Ok(Response::redirect(format!(
                        "{}/",
                        encode_path(&request.path)
                    )));
                }

                let html = listing::render(&request.path, &entries);
                Ok(ResponseBuilder::new(StatusCode::Ok)
                    .header("Content-Type", "text/html; charset=utf-8")
                    .body(html)
                    .build())
            }

            ResolvedTarget::File { path, .. } if is_markdown(&path) => {
                let source = fs::read_to_string(&path).await?;
                let fragment = markdown::render(&source);

                let title = path
                    .file_name()
                    .map(|n| escape_html(&n.to_string_lossy()))
                    .unwrap_or_default();
                let html = render_page(&title, &fragment);

                Ok(ResponseBuilder::new(StatusCode::Ok)
                    .header("Content-Type", "text/html; charset=utf-8")
                    .body(html)
                    .build())
            }

            ResolvedTarget::File { path, .. } => {
                let stream = FileStream::open(&path).await?;
                let content_type =
                    mime::content_type(path.extension().and_then(|e| e.to_str()));

                Ok(ResponseBuilder::new(StatusCode::Ok)
                    .header("Content-Type", content_type)
                    .file_body(stream)
                    .build())
            }
        }
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

/// Re-encodes a decoded request path for use in a Location header.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(encode_href_segment)
        .collect::<Vec<_>>()
        .join("/")
}
