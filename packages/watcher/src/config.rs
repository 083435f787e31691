use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub telegram_bot_token: Option<String>,
    /// How often each running session re-checks its targets
    pub fetch_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let fetch_interval_secs: u64 = env::var("FETCH_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .context("FETCH_INTERVAL_SECS must be a valid number of seconds")?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://watcher.db".to_string()),
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN").ok(),
            fetch_interval: Duration::from_secs(fetch_interval_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fetch_interval_is_a_minute() {
        // Only assert on the default path; env vars are process-global
        // so we avoid mutating them in tests.
        if env::var("FETCH_INTERVAL_SECS").is_err() {
            let config = Config::from_env().unwrap();
            assert_eq!(config.fetch_interval, Duration::from_secs(60));
        }
    }
}
