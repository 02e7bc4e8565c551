use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Read once at startup; never reloaded.
#[derive(Debug, Clone)]
pub struct Config {
    /// Local area shown in the left stats column (e.g. "Exeter").
    pub location: String,
    /// Area type the statistics feed uses to filter the local query.
    pub location_type: String,
    /// Nation used for the national figures.
    pub nation: String,
    pub news_api_key: String,
    /// Keyword string sent to the news search.
    pub news_terms: String,
    /// Fixed-layout history file; row/column positions are load-bearing.
    pub history_csv: String,
    pub image: String,
    pub static_dir: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            location: env_or("DASHBOARD_LOCATION", "Exeter"),
            location_type: env_or("DASHBOARD_LOCATION_TYPE", "ltla"),
            nation: env_or("DASHBOARD_NATION", "England"),
            news_api_key: require_env("NEWS_API_KEY")?,
            news_terms: env_or("NEWS_TERMS", "Covid COVID-19 coronavirus"),
            history_csv: env_or("HISTORY_CSV", "data/nation_2021-10-28.csv"),
            image: env_or("DASHBOARD_IMAGE", "/static/covid.png"),
            static_dir: env_or("STATIC_DIR", "static"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
