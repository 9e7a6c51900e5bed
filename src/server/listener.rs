use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::files::FileHandler;
use crate::http::connection::Connection;

/// Binds the listen address and serves connections until the task is
/// cancelled. One tokio task per connection; the shared [`FileHandler`]
/// is read-only, so no locking is needed across connections.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let handler = Arc::new(FileHandler::new(&cfg.root)?);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!(
        "Serving {} on http://{}",
        handler.root().display(),
        cfg.listen_addr
    );

    loop {
        let (socket, peer) = listener.accept().await?;
        tracing::debug!(peer = %peer, "accepted connection");

        let handler = handler.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, handler);
            if let Err(e) = conn.run().await {
                tracing::error!(peer = %peer, error = %e, "connection error");
            }
        });
    }
}
