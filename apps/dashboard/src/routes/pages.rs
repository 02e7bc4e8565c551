use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
};
use chrono::Local;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::render;
use crate::state::AppState;
use crate::updates::RefreshKind;

/// Query parameters accepted by the command endpoint. Names match the form
/// controls on the landing page.
#[derive(Debug, Deserialize)]
pub struct CommandParams {
    /// Article title to dismiss.
    notif: Option<String>,
    /// Pending-update label to cancel.
    update_item: Option<String>,
    /// Target time of day (HH:MM) for a new update.
    update: Option<String>,
    /// Label for the new update.
    #[serde(rename = "two")]
    label: Option<String>,
    repeat: Option<String>,
    #[serde(rename = "covid-data")]
    covid_data: Option<String>,
    news: Option<String>,
}

/// GET /
/// Renders the landing view.
pub async fn home(State(state): State<AppState>) -> Html<String> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard
        .run_due_updates(&state.covid, &state.news, &state.config)
        .await;

    Html(render::dashboard_page(&state.config, &dashboard))
}

/// GET /index
/// Applies user commands, then redirects back to the landing view. Unknown
/// titles and labels are silent no-ops; a rejected schedule logs a warning
/// and creates nothing.
pub async fn command(
    State(state): State<AppState>,
    Query(params): Query<CommandParams>,
) -> Redirect {
    let mut dashboard = state.dashboard.lock().await;
    dashboard
        .run_due_updates(&state.covid, &state.news, &state.config)
        .await;

    if let Some(title) = &params.notif {
        dashboard.dismiss_article(title);
    }

    if let Some(label) = &params.update_item {
        dashboard.updates.cancel(label);
    }

    if let Some(time_input) = &params.update {
        match refresh_kind(&params) {
            Some(kind) => {
                let label = params.label.as_deref().unwrap_or_default();
                let repeat = params.repeat.is_some();
                if let Err(e) =
                    dashboard
                        .updates
                        .schedule(label, time_input, repeat, kind, Local::now())
                {
                    warn!("update not scheduled: {e}");
                }
            }
            None => debug!("update request without covid or news selection ignored"),
        }
    }

    Redirect::to("/")
}

fn refresh_kind(params: &CommandParams) -> Option<RefreshKind> {
    match (params.covid_data.is_some(), params.news.is_some()) {
        (true, true) => Some(RefreshKind::Both),
        (true, false) => Some(RefreshKind::Covid),
        (false, true) => Some(RefreshKind::News),
        (false, false) => None,
    }
}
