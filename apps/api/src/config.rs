use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// The model API key is intentionally optional: without it the chat and
/// fit-finder endpoints answer 503 while everything else keeps working.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub content_dir: PathBuf,
    pub static_dir: PathBuf,
    pub site_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            content_dir: PathBuf::from(
                std::env::var("CONTENT_DIR").unwrap_or_else(|_| "content".to_string()),
            ),
            static_dir: PathBuf::from(
                std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
            ),
            site_url: std::env::var("SITE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
