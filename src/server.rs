//! Gemini server and graceful shutdown.
//!
//! # Graceful shutdown
//!
//! On **SIGTERM** or **SIGINT** the server:
//! 1. Immediately stops `listener.accept()`; no new connections are made.
//! 2. Lets every in-flight connection task run to completion. Each one is
//!    bounded by the request timeout, so draining cannot hang forever.
//! 3. Returns from [`Server::serve`], which lets `main` exit cleanly.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_rustls::TlsAcceptor;
use tokio_rustls::rustls::ServerConfig;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::connection::{ConnectionSettings, serve_connection};
use crate::error::Error;
use crate::handler::Handler;

/// The Gemini server.
pub struct Server {
    addr: String,
    tls: Arc<ServerConfig>,
    max_connections: usize,
    settings: ConnectionSettings,
}

impl Server {
    /// Configures the server to listen on `addr` (any `host:port` that
    /// resolves) when [`serve`](Server::serve) is called.
    pub fn bind(addr: impl Into<String>, tls: Arc<ServerConfig>) -> Self {
        Self {
            addr: addr.into(),
            tls,
            max_connections: 1024,
            settings: ConnectionSettings::default(),
        }
    }

    pub fn from_config(config: &Config, tls: Arc<ServerConfig>) -> Self {
        Self::bind(config.addr.clone(), tls)
            .max_connections(config.max_connections)
            .request_timeout(config.request_timeout())
            .hosts(config.hosts.clone())
    }

    /// Caps the number of connections served at once. Further connections
    /// wait in the kernel backlog.
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.settings.request_timeout = timeout;
        self
    }

    pub fn hosts(mut self, hosts: Vec<String>) -> Self {
        self.settings.hosts = hosts.into();
        self
    }

    /// Starts accepting connections and dispatching them to `handler`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight connections completing).
    pub async fn serve<H: Handler>(self, handler: H) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr.as_str()).await?;
        let local_addr = listener.local_addr()?;

        let acceptor = TlsAcceptor::from(self.tls);
        let handler = Arc::new(handler);
        let settings = Arc::new(self.settings);
        let limit = Arc::new(Semaphore::new(self.max_connections));

        info!(addr = %local_addr, max_connections = self.max_connections, "ursa listening");

        let mut tasks = JoinSet::new();

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Check shutdown first so a SIGTERM stops accepting at once,
                // even if more connections are queued.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                // Only accept while a connection slot is free; otherwise wait
                // for a task to finish below.
                res = listener.accept(), if limit.available_permits() > 0 => {
                    let (tcp, peer) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };
                    let Ok(permit) = Arc::clone(&limit).try_acquire_owned() else {
                        continue;
                    };

                    let acceptor = acceptor.clone();
                    let handler = Arc::clone(&handler);
                    let settings = Arc::clone(&settings);

                    tasks.spawn(async move {
                        let _permit = permit;

                        let handshake = tokio::time::timeout(settings.request_timeout, acceptor.accept(tcp));
                        let stream = match handshake.await {
                            Ok(Ok(stream)) => stream,
                            Ok(Err(e)) => {
                                warn!(peer = %peer, "tls handshake failed: {e}");
                                return;
                            }
                            Err(_) => {
                                warn!(peer = %peer, "tls handshake timed out");
                                return;
                            }
                        };

                        if let Err(e) = serve_connection(stream, peer, &*handler, &settings).await {
                            error!(peer = %peer, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet does not grow
                // without bound, and so freed slots re-enable `accept`.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("ursa stopped");
        Ok(())
    }
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first SIGTERM or SIGINT. On Windows only Ctrl-C is
/// available.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
