use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://api.exa.ai";

/// Runtime settings for the search client, the feedback log and the HTTP server.
///
/// Built once at startup and handed to the components that need it.
#[derive(Debug, Clone)]
pub struct Config {
    pub exa_api_key: String,
    pub exa_base_url: String,
    pub timeout_secs: u64,
    pub feedback_log_path: PathBuf,
    pub bind_addr: String,
    pub static_dir: PathBuf,
}

impl Config {
    /// Load configuration from the environment, reading a `.env` file first if present.
    ///
    /// The API key is not checked here: the feedback commands never talk to the
    /// search API. Call [`Config::validate`] before building a client.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key/value source, applying defaults for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        Ok(Config {
            exa_api_key: get("EXA_API_KEY", ""),
            exa_base_url: get("EXA_BASE_URL", DEFAULT_BASE_URL),
            timeout_secs: get("EXA_TIMEOUT_SECS", "30")
                .parse()
                .context("EXA_TIMEOUT_SECS must be a whole number of seconds")?,
            feedback_log_path: get("FEEDBACK_LOG_PATH", "feedback_log.json").into(),
            bind_addr: get("BIND_ADDR", "127.0.0.1:3000"),
            static_dir: get("STATIC_DIR", "static").into(),
        })
    }

    /// Config pointing at the hosted API with every other setting at its default.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Config {
            exa_api_key: api_key.into(),
            exa_base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            feedback_log_path: PathBuf::from("feedback_log.json"),
            bind_addr: "127.0.0.1:3000".to_string(),
            static_dir: PathBuf::from("static"),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.exa_api_key.trim().is_empty() {
            bail!("EXA_API_KEY must not be empty");
        }
        if self.timeout_secs == 0 {
            bail!("EXA_TIMEOUT_SECS must be greater than 0");
        }
        if self.exa_base_url.trim().is_empty() {
            bail!("EXA_BASE_URL must not be empty");
        }
        Ok(())
    }
}
