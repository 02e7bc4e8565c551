use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::covid::client::CovidApiClient;
use crate::dashboard::DashboardState;
use crate::news::client::NewsApiClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub covid: CovidApiClient,
    pub news: NewsApiClient,
    /// Single-writer dashboard state. Handlers hold the lock for their whole
    /// poll-mutate-render sequence, so scheduled refreshes never interleave
    /// with rendering and a slow upstream call blocks that render.
    pub dashboard: Arc<Mutex<DashboardState>>,
}
