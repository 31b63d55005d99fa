use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::shutdown::ShutdownManager;

use super::error::ServerError;
use super::router::build_router;
use super::store::ReportStore;

pub struct ReportServer {
    /// The bound listener, kept alive between bind() and run().
    listener: Option<TcpListener>,
    router: Router,
    shutdown: Arc<ShutdownManager>,
}

impl ReportServer {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self {
            listener: None,
            router: build_router(store),
            shutdown: Arc::new(ShutdownManager::new()),
        }
    }

    /// Bind the listener. Port 0 picks a free port.
    /// Returns the actual bound address.
    pub async fn bind(&mut self, addr: &str) -> Result<SocketAddr, ServerError> {
        let bind_addr: SocketAddr = addr.parse().map_err(|_| ServerError::InvalidAddress {
            addr: addr.to_string(),
        })?;
        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        let actual = listener.local_addr()?;
        self.listener = Some(listener);
        tracing::info!("Report server bound to {}", actual);
        Ok(actual)
    }

    pub fn handle(&self) -> ReportServerHandle {
        ReportServerHandle {
            shutdown: self.shutdown.clone(),
        }
    }

    /// Serve until Ctrl-C, SIGTERM or `ReportServerHandle::shutdown`.
    ///
    /// Consumes self to take ownership of the pre-bound listener.
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = self.listener.ok_or(ServerError::NotBound)?;
        tracing::info!("Starting report server on {}", listener.local_addr()?);

        let shutdown = self.shutdown.clone();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .into_future()
            .await?;

        tracing::info!("Report server stopped");
        Ok(())
    }
}

#[derive(Clone)]
pub struct ReportServerHandle {
    shutdown: Arc<ShutdownManager>,
}

impl ReportServerHandle {
    pub fn shutdown(&self) {
        self.shutdown.signal();
    }
}
