//! Web server for plaza.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::auth::TokenService;
use crate::config::Config;
use crate::Database;

use super::handlers::AppState;
use super::router::create_router;

/// Web server for the API.
pub struct WebServer {
    /// Host to bind.
    host: String,
    /// Port to bind (0 for an ephemeral port).
    port: u16,
    /// Application state.
    app_state: Arc<AppState>,
    /// Allowed CORS origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server from configuration and an opened database.
    pub fn new(config: &Config, db: Database) -> Self {
        let tokens = TokenService::new(&config.auth.jwt_secret, config.auth.token_expiry_secs);
        let app_state = AppState::new(db, tokens, config.feed);

        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            app_state: Arc::new(app_state),
            cors_origins: config.server.cors_origins.clone(),
        }
    }

    /// Override the port to bind.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Build the router without binding.
    pub fn router(&self) -> Router {
        create_router(self.app_state.clone(), &self.cors_origins)
    }

    async fn bind(&self) -> Result<(TcpListener, SocketAddr), std::io::Error> {
        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);
        Ok((listener, local_addr))
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let router = self.router();
        let (listener, _) = self.bind().await?;
        axum::serve(listener, router).await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr, std::io::Error> {
        let router = self.router();
        let (listener, local_addr) = self.bind().await?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
