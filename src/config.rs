use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/exoplanet";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("EXOPLANET_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.into()),
            debug: env::var("DEBUG")
                .map(|v| v == "1" || v == "true")
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            debug: false,
        }
    }
}
