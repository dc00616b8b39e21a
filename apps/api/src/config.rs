use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Read once at startup and passed explicitly through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key. Optional: when absent, grading takes the
    /// deterministic fallback path instead of failing startup.
    pub gemini_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on a single grading call, in seconds.
    pub grader_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            grader_timeout_secs: std::env::var("GRADER_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("GRADER_TIMEOUT_SECS must be a number of seconds")?,
        })
    }
}

/// Returns `None` for unset or empty variables, so an empty
/// `GEMINI_API_KEY=` line in a .env file behaves like no key at all.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
