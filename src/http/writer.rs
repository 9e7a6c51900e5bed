use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::http::response::{Body, Response};

const HTTP_VERSION: &str = "HTTP/1.1";
const SERVER_NAME: &str = concat!("mdserve/", env!("CARGO_PKG_VERSION"));

/// Serializes the status line and headers.
///
/// Headers always go on the wire as one block before any body byte, so
/// Content-Type and Content-Length precede the body by construction.
fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    if !resp.headers.contains_key("Server") {
        buf.extend_from_slice(format!("Server: {SERVER_NAME}\r\n").as_bytes());
    }
    buf.extend_from_slice(b"X-Content-Type-Options: nosniff\r\n");

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes one response onto the socket.
///
/// Buffered bodies are written as-is; file bodies are pulled from the
/// stream chunk by chunk, in order, so a response's bytes are never
/// reordered and memory stays bounded. For HEAD requests the body is
/// suppressed while the headers (including Content-Length) stay truthful.
pub struct ResponseWriter {
    response: Response,
    include_body: bool,
}

impl ResponseWriter {
    pub fn new(response: Response, include_body: bool) -> Self {
        Self {
            response,
            include_body,
        }
    }

    pub async fn write_to_stream(&mut self, stream: &mut TcpStream) -> anyhow::Result<()> {
        let head = serialize_head(&self.response);
        stream.write_all(&head).await?;

        if !self.include_body {
            return Ok(());
        }

        match &mut self.response.body {
            Body::Bytes(bytes) => {
                stream.write_all(bytes).await?;
            }
            Body::File(file) => {
                // A read failure here means the advertised Content-Length
                // can no longer be honored; the error propagates and the
                // connection is closed early (partial transfer, no retry).
                while let Some(chunk) = file.next_chunk().await? {
                    stream.write_all(&chunk).await?;
                }
            }
        }

        Ok(())
    }
}
