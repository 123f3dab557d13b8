use std::env;
use std::time::Duration;

use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<SecretString>,
    pub learner_id: String,
    pub request_timeout_secs: u64,
    pub clock_tick_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api".to_string()),
            api_token: env::var("API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
            learner_id: env::var("LEARNER_ID").unwrap_or_else(|_| "learner".to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(15),
            clock_tick_ms: env::var("CLOCK_TICK_MS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(1000),
        }
    }

    /// Rejects settings the client cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        reqwest::Url::parse(&self.api_base_url).map_err(|e| {
            AppError::ConfigError(format!(
                "API_BASE_URL '{}' is not a valid URL: {}",
                self.api_base_url, e
            ))
        })?;

        if self.learner_id.trim().is_empty() {
            return Err(AppError::ConfigError("LEARNER_ID must not be empty".to_string()));
        }

        if self.request_timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        if self.clock_tick_ms == 0 {
            return Err(AppError::ConfigError(
                "CLOCK_TICK_MS must be greater than zero".to_string(),
            ));
        }

        if self.api_token.is_none() {
            log::warn!("API_TOKEN is not set, requests will be sent unauthenticated");
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.clock_tick_ms)
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            api_token: Some(SecretString::from("test-token".to_string())),
            learner_id: "learner-1".to_string(),
            request_timeout_secs: 5,
            clock_tick_ms: 1000,
        }
    }
}
