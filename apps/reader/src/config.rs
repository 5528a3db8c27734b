use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_GENERATION_URL;
use crate::speech::DEFAULT_SPEECH_URL;

/// Application configuration loaded from environment variables.
/// Fails at startup if the API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub generation_url: String,
    pub speech_url: String,
    pub output_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_key: require_env("DASHSCOPE_API_KEY")?,
            generation_url: optional_env("GENERATION_URL", DEFAULT_GENERATION_URL),
            speech_url: optional_env("SPEECH_URL", DEFAULT_SPEECH_URL),
            output_dir: PathBuf::from(optional_env("OUTPUT_DIR", "output")),
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
