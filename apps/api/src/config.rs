use anyhow::{ensure, Context, Result};

/// Environment variables checked for the Gemini API key, highest priority first.
pub const API_KEY_VARS: [&str; 3] = ["GEMINI_API_KEY", "API_KEY", "GOOGLE_API_KEY"];

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Application configuration loaded from environment variables.
///
/// The API key is not part of this struct: it is looked up by [`ApiKeySource`]
/// on every generation attempt so the service can start without one.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub target_total: usize,
    pub batch_size: usize,
    pub gemini_model: String,
    pub gemini_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            target_total: parse_env("TARGET_TOTAL", 100)?,
            batch_size: parse_env("BATCH_SIZE", 20)?,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };

        ensure!(config.target_total > 0, "TARGET_TOTAL must be greater than zero");
        ensure!(config.batch_size > 0, "BATCH_SIZE must be greater than zero");

        Ok(config)
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Ordered fallback over named credential sources.
///
/// Resolution happens on demand, never at process start.
#[derive(Debug, Clone)]
pub struct ApiKeySource {
    vars: Vec<String>,
}

impl Default for ApiKeySource {
    fn default() -> Self {
        Self::from_vars(API_KEY_VARS)
    }
}

impl ApiKeySource {
    pub fn from_vars<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the first non-blank key, checking sources in priority order.
    pub fn resolve(&self) -> Option<String> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    fn resolve_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.vars
            .iter()
            .filter_map(|name| lookup(name.as_str()))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }

    pub fn source_names(&self) -> &[String] {
        &self.vars
    }
}
