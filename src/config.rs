use anyhow::Result;

/// Configuration loaded from environment variables
#[derive(Debug)]
pub struct Config {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

const DEFAULT_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    // Read variables
    let api_key = std::env::var("LASTFM_API_KEY")?;
    let base_url =
        std::env::var("LASTFM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let timeout_secs = std::env::var("LASTFM_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Ok(Config {
        base_url,
        api_key,
        timeout_secs,
    })
}
