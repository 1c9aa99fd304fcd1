//! One request, one response, per connection.
//!
//! Reads the request line, rejects what cannot be routed, hands the rest to
//! the [`Handler`], then closes the write side. The whole exchange runs
//! under the request timeout; on expiry the handler future is dropped,
//! which cancels any write still in flight.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::handler::Handler;
use crate::request::{IncomingRequest, MAX_URL_LEN};
use crate::response::ResponseWriter;
use crate::status::Status;

// URL plus CRLF.
const REQUEST_LINE_LIMIT: u64 = MAX_URL_LEN as u64 + 2;

/// Per-connection limits shared by every connection task.
#[derive(Clone, Debug)]
pub struct ConnectionSettings {
    /// Upper bound on reading the request and writing the response.
    pub request_timeout: Duration,
    /// Hosts this server answers for. Empty means any host.
    pub hosts: Arc<[String]>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self { request_timeout: Duration::from_secs(10), hosts: Arc::from(Vec::new()) }
    }
}

/// Serves a single Gemini exchange on `stream`.
///
/// Returns the status that was written, or `None` when the handler chose to
/// write nothing. The stream is shut down cleanly in both cases.
pub async fn serve_connection<S, H>(
    mut stream: S,
    peer: SocketAddr,
    handler: &H,
    settings: &ConnectionSettings,
) -> Result<Option<Status>, Error>
where
    S: AsyncRead + AsyncWrite + Send + Unpin,
    H: Handler,
{
    let exchange = exchange(&mut stream, peer, handler, &settings.hosts);
    let status = tokio::time::timeout(settings.request_timeout, exchange)
        .await
        .map_err(|_| Error::Timeout)??;

    if status.is_none() {
        debug!(peer = %peer, "handler wrote no response, closing");
    }
    stream.shutdown().await?;
    Ok(status)
}

async fn exchange<S, H>(
    stream: &mut S,
    peer: SocketAddr,
    handler: &H,
    hosts: &[String],
) -> Result<Option<Status>, Error>
where
    S: AsyncRead + AsyncWrite + Send + Unpin,
    H: Handler,
{
    let mut line = Vec::with_capacity(128);
    let mut reader = BufReader::new(&mut *stream).take(REQUEST_LINE_LIMIT);
    reader.read_until(b'\n', &mut line).await?;
    drop(reader);

    let mut rw = ResponseWriter::new(stream);
    let parsed = IncomingRequest::parse(&line).and_then(|req| {
        req.check_host(hosts)?;
        Ok(req)
    });

    match parsed {
        Err(e) => {
            // The error text can echo client input of any length; keep it
            // out of the meta.
            warn!(peer = %peer, error = %e, "rejected request");
            rw.write_status(e.status(), e.status().text()).await?;
        }
        Ok(req) => {
            let req = req.with_remote_addr(peer);
            handler.handle(&mut rw, &req).await?;
            info!(peer = %peer, path = req.path(), status = ?rw.status(), "served");
        }
    }

    Ok(rw.status())
}
