//! Client for the coronavirus statistics API.
//!
//! One outbound query per call, no retry or backoff: a transport failure is
//! surfaced to the caller as an explicit error and the caller decides whether
//! to keep stale data. Records come back most-recent-first; that ordering is
//! an upstream contract the aggregation offsets depend on.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const COVID_API_URL: &str = "https://api.coronavirus.data.gov.uk/v1/data";

/// Response structure requested from the API. Keys mirror the upstream metric
/// names so the same six fields arrive regardless of area type.
const STRUCTURE: &str = concat!(
    r#"{"date":"date","areaName":"areaName","#,
    r#""newCasesByPublishDate":"newCasesByPublishDate","#,
    r#""newCasesBySpecimenDate":"newCasesBySpecimenDate","#,
    r#""cumDailyNsoDeathsByDeathDate":"cumDailyNsoDeathsByDeathDate","#,
    r#""hospitalCases":"hospitalCases"}"#
);

#[derive(Debug, Error)]
pub enum CovidApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// One day's statistics row from the feed.
///
/// Numeric fields are nullable upstream; `None` means "not reported" and must
/// be skipped by consumers, never treated as zero.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyRecord {
    pub date: String,
    #[serde(rename = "areaName")]
    pub area_name: String,
    #[serde(rename = "newCasesByPublishDate")]
    pub new_cases_by_publish_date: Option<i64>,
    #[serde(rename = "newCasesBySpecimenDate")]
    pub new_cases_by_specimen_date: Option<i64>,
    #[serde(rename = "cumDailyNsoDeathsByDeathDate")]
    pub cum_deaths: Option<i64>,
    #[serde(rename = "hospitalCases")]
    pub hospital_cases: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CovidResponse {
    data: Vec<DailyRecord>,
}

#[derive(Clone)]
pub struct CovidApiClient {
    client: Client,
}

impl CovidApiClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// Fetches daily records filtered by (area name, area type).
    pub async fn daily_records(
        &self,
        location: &str,
        location_type: &str,
    ) -> Result<Vec<DailyRecord>, CovidApiError> {
        let filters = format!("areaType={location_type};areaName={location}");

        let response = self
            .client
            .get(COVID_API_URL)
            .query(&[("filters", filters.as_str()), ("structure", STRUCTURE)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CovidApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: CovidResponse = response.json().await?;
        if let Some(latest) = body.data.first() {
            debug!(
                "covid API returned {} records for {}, latest {}",
                body.data.len(),
                latest.area_name,
                latest.date
            );
        }
        Ok(body.data)
    }
}

impl Default for CovidApiClient {
    fn default() -> Self {
        Self::new()
    }
}
