//! Chunked file streaming.
//!
//! A [`FileStream`] reads a file in fixed-size sequential chunks so memory
//! use stays bounded regardless of file size. A stream is created fresh
//! per request and is not restartable; dropping it (on completion or on
//! client disconnect mid-stream) releases the file handle.

use std::io;
use std::path::Path;

use bytes::Bytes;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Size of each chunk read from disk.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// A finite, strictly sequential chunked reader over one file.
#[derive(Debug)]
pub struct FileStream {
    file: File,
    size: u64,
    remaining: u64,
}

impl FileStream {
    /// Opens the file and records its size.
    ///
    /// The size captured here is what the response advertises as
    /// Content-Length, so the stream never emits more than `size` bytes
    /// even if the file grows while being served.
    pub async fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path).await?;
        let size = file.metadata().await?.len();

        Ok(Self {
            file,
            size,
            remaining: size,
        })
    }

    /// Total number of bytes this stream will produce.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Reads the next chunk, or returns `None` once the stream is exhausted.
    ///
    /// Chunks arrive in file order. If the file is truncated underneath an
    /// in-flight stream, the short read surfaces as an error so the caller
    /// can abort the connection rather than pad the response.
    pub async fn next_chunk(&mut self) -> io::Result<Option<Bytes>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        let want = CHUNK_SIZE.min(usize::try_from(self.remaining).unwrap_or(CHUNK_SIZE));
        let mut buf = vec![0u8; want];

        let n = self.file.read(&mut buf).await?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "file truncated mid-stream",
            ));
        }

        buf.truncate(n);
        self.remaining -= n as u64;
        Ok(Some(Bytes::from(buf)))
    }
}
