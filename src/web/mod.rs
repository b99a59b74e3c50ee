mod pages;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use reqwest::Client;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::constants::FETCH_USER_AGENT;
use crate::feed::HttpMediaProbe;
use crate::telegram::ChannelFetcher;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: ChannelFetcher,
    pub probe: HttpMediaProbe,
}

impl AppState {
    /// Build the HTTP clients used to reach Telegram and media hosts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the Telegram
    /// base URL is invalid.
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .user_agent(FETCH_USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        let fetcher = ChannelFetcher::new(client.clone(), &config.telegram_base_url)
            .context("Invalid Telegram base URL")?;
        let probe = HttpMediaProbe::new(client, config.probe_timeout);

        Ok(Self {
            config: Arc::new(config),
            fetcher,
            probe,
        })
    }
}

/// Start the web server.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn serve(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.web_host, config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let state = AppState::new(config)?;
    let app = create_app(state);

    info!(addr = %addr, "Starting HTTP web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app)
        .await
        .context("Web server error")?;

    Ok(())
}

/// Create the main application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
