use libris_store::StoreHandle;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Libris HTTP server: owns the store for the life of the process
pub struct LibrisServer {
    config: ServerConfig,
    store: StoreHandle,
}

impl LibrisServer {
    /// Open the store named in `config`
    ///
    /// # Errors
    ///
    /// `ServerError::Store` when the database cannot be opened or bootstrapped.
    pub fn open(config: ServerConfig) -> ServerResult<Self> {
        let store = StoreHandle::open(&config.database, config.pool)?;
        tracing::info!(
            location = %store.location(),
            max_connections = store.config().max_connections,
            author_link_policy = ?config.author_link_policy,
            "Store ready"
        );
        Ok(Self { config, store })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Build the router (useful for testing)
    pub fn router(&self) -> axum::Router {
        let state = AppState::new(self.store.clone(), self.config.author_link_policy);
        build_router(state, &self.config.api_prefix)
    }

    /// Serve until Ctrl-C, then close the store
    ///
    /// # Errors
    ///
    /// `ServerError::Io` when the listener cannot bind or the accept loop fails.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(
            bind_addr = %self.config.bind_addr,
            api_prefix = %self.config.api_prefix,
            "Libris server listening"
        );

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(ServerError::from);

        self.store.close();
        served
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown requested"),
        Err(e) => tracing::error!(err = %e, "Failed to listen for Ctrl-C; shutting down"),
    }
}
