//! Client for the news search API. One outbound query per call, no retry;
//! pagination beyond the API's first page is not followed.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const NEWS_API_URL: &str = "https://newsapi.org/v2/everything";

#[derive(Debug, Error)]
pub enum NewsApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// One article from the search results. `title` doubles as the dismissal key
/// on the dashboard; first match only, uniqueness is not guaranteed.
#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    articles: Vec<Article>,
}

#[derive(Clone)]
pub struct NewsApiClient {
    client: Client,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Fetches every article matching the keyword string.
    pub async fn search(&self, terms: &str) -> Result<Vec<Article>, NewsApiError> {
        let response = self
            .client
            .get(NEWS_API_URL)
            .query(&[("q", terms), ("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NewsApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: NewsResponse = response.json().await?;
        debug!("news API returned {} articles", body.articles.len());
        Ok(body.articles)
    }
}
