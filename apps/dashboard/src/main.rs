mod config;
mod covid;
mod dashboard;
mod news;
mod render;
mod routes;
mod state;
mod updates;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::covid::client::CovidApiClient;
use crate::covid::history;
use crate::dashboard::DashboardState;
use crate::news::client::NewsApiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting covid dashboard v{}", env!("CARGO_PKG_VERSION"));

    // Historical baseline from the fixed-layout file. Malformed input is fatal.
    let summary = history::load_summary(Path::new(&config.history_csv))
        .with_context(|| format!("failed to load history file '{}'", config.history_csv))?;
    info!("history baseline loaded: {summary:?}");

    let covid = CovidApiClient::new();
    let news = NewsApiClient::new(config.news_api_key.clone());

    // Best effort at startup; the baseline stays on screen if a feed is down.
    let mut dashboard = DashboardState::seeded_from(&summary);
    dashboard.refresh_covid(&covid, &config).await;
    dashboard.refresh_news(&news, &config).await;

    let state = AppState {
        config: config.clone(),
        covid,
        news,
        dashboard: Arc::new(Mutex::new(dashboard)),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
