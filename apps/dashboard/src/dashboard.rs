//! Mutable dashboard state and the refresh operations that act on it.

use chrono::Local;
use tracing::{error, info};

use crate::config::Config;
use crate::covid::aggregate::{self, CovidSnapshot};
use crate::covid::client::CovidApiClient;
use crate::covid::history::HistoricalSummary;
use crate::news::client::{Article, NewsApiClient};
use crate::updates::UpdateRegistry;

/// Everything the page renders from. Owned by `AppState` behind a single
/// mutex so scheduled refreshes never run concurrently with rendering.
pub struct DashboardState {
    pub snapshot: CovidSnapshot,
    pub articles: Vec<Article>,
    pub updates: UpdateRegistry,
}

impl DashboardState {
    /// Initial state seeded from the fixed-layout history file. The history
    /// covers national figures only; the local count stays at zero until the
    /// first live refresh.
    pub fn seeded_from(history: &HistoricalSummary) -> Self {
        Self {
            snapshot: CovidSnapshot {
                local_seven_day_cases: 0,
                national_seven_day_cases: history.seven_day_cases,
                hospital_cases: Some(history.hospital_cases),
                total_deaths: Some(history.total_deaths),
            },
            articles: Vec::new(),
            updates: UpdateRegistry::default(),
        }
    }

    /// Replaces the snapshot wholesale. A failed fetch keeps the previous
    /// snapshot on screen.
    pub async fn refresh_covid(&mut self, client: &CovidApiClient, config: &Config) {
        match aggregate::fetch_snapshot(client, config).await {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                info!("covid snapshot refreshed");
            }
            Err(e) => error!("covid refresh failed, keeping previous data: {e}"),
        }
    }

    /// Replaces the article list wholesale; previously dismissed articles
    /// reappear if the search still returns them.
    pub async fn refresh_news(&mut self, client: &NewsApiClient, config: &Config) {
        match client.search(&config.news_terms).await {
            Ok(articles) => {
                info!("news refreshed: {} articles", articles.len());
                self.articles = articles;
            }
            Err(e) => error!("news refresh failed, keeping previous articles: {e}"),
        }
    }

    /// Executes every due pending update. Called at the start of each
    /// request; the refreshes run on the request that observed them due.
    pub async fn run_due_updates(
        &mut self,
        covid: &CovidApiClient,
        news: &NewsApiClient,
        config: &Config,
    ) {
        for update in self.updates.poll(Local::now()) {
            if update.kind.refreshes_covid() {
                self.refresh_covid(covid, config).await;
            }
            if update.kind.refreshes_news() {
                self.refresh_news(news, config).await;
            }
        }
    }

    /// Removes the first article whose title matches. Unknown titles are a
    /// silent no-op.
    pub fn dismiss_article(&mut self, title: &str) {
        if let Some(pos) = self.articles.iter().position(|a| a.title == title) {
            self.articles.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> DashboardState {
        DashboardState::seeded_from(&HistoricalSummary {
            seven_day_cases: 240_299,
            hospital_cases: 7_019,
            total_deaths: 141_544,
        })
    }

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            url: format!("https://example.com/{title}"),
            description: None,
        }
    }

    #[test]
    fn seed_carries_national_history() {
        let state = seeded();
        assert_eq!(state.snapshot.national_seven_day_cases, 240_299);
        assert_eq!(state.snapshot.hospital_cases, Some(7_019));
        assert_eq!(state.snapshot.total_deaths, Some(141_544));
        assert_eq!(state.snapshot.local_seven_day_cases, 0);
    }

    #[test]
    fn dismiss_removes_first_title_match_only() {
        let mut state = seeded();
        state.articles = vec![article("a"), article("b"), article("a")];

        state.dismiss_article("a");
        let titles: Vec<_> = state.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["b", "a"]);

        state.dismiss_article("unknown");
        assert_eq!(state.articles.len(), 2);
    }
}
