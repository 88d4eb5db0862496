use anyhow::{bail, Context, Result};
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base address of the resume backend, without a trailing slash.
    pub backend_url: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let backend_url = std::env::var("BACKEND_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        Ok(Config {
            backend_url: normalize_backend_url(&backend_url)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Validates the backend address and strips trailing slashes so endpoint
/// paths can be appended directly.
pub fn normalize_backend_url(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let parsed = Url::parse(raw).with_context(|| format!("BACKEND_URL '{raw}' is not a valid URL"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("BACKEND_URL must use http or https, got '{}'", parsed.scheme());
    }
    Ok(raw.trim_end_matches('/').to_string())
}
