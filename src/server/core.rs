use axum::Router;
use axum::middleware;
use axum::routing::post;
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::auth::{BcryptHasher, CredentialLimits, CredentialStore};
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::middleware::log_request;
use crate::protocol::{AppState, handle_login, handle_register};

pub struct Server {
    listener: TcpListener,
    router: Router,
    config: Arc<ServerConfig>,
}

impl Server {
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let config = Arc::new(config);
        let socket = config.listen_socket();

        let hasher = BcryptHasher::new(config.bcrypt_cost);
        let store = CredentialStore::new(Arc::new(hasher), CredentialLimits::from(config.as_ref()))?;
        info!(
            "Credential store ready (bcrypt cost {}, max username {} bytes, max password {} bytes)",
            hasher.cost(),
            config.max_username_length,
            config.max_password_length
        );

        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e.into());
            }
        };

        let state = AppState {
            store: Arc::new(store),
        };

        Ok(Self {
            listener,
            router: build_router(state),
            config,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves requests until Ctrl-C is received
    pub async fn start(self) -> Result<(), ServerError> {
        let addr = self.local_addr()?;
        info!(
            "Starting RAX auth server on http://{} (configured {})",
            addr,
            self.config.listen_socket()
        );

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped; all registrations discarded");
        Ok(())
    }
}

/// Route table shared by the server and the integration tests
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(handle_register))
        .route("/login", post(handle_login))
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
