use std::env;
use std::path::PathBuf;

use crate::errors::ChainError;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_HISTORY_PATH: &str = "messages.jsonl";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub openai_org_id: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub temperature: f32,
    pub history_path: PathBuf,
    /// Feed the back-translation into the rolling summary as well.
    pub summarize_translation: bool,
    /// Pretty-print every conversation before it is sent.
    pub verbose: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ChainError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so callers are not tied to the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ChainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let openai_api_key = get("OPENAI_API_KEY")
            .ok_or_else(|| ChainError::Config("OPENAI_API_KEY is not set".to_string()))?;

        let temperature = match get("DUALCHAIN_TEMPERATURE") {
            Some(raw) => raw.parse::<f32>().map_err(|e| {
                ChainError::Config(format!("DUALCHAIN_TEMPERATURE: {}", e))
            })?,
            None => DEFAULT_TEMPERATURE,
        };

        Ok(Self {
            openai_api_key,
            openai_org_id: get("OPENAI_ORG_ID"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            temperature,
            history_path: get("DUALCHAIN_HISTORY_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_HISTORY_PATH), PathBuf::from),
            summarize_translation: parse_flag(
                "DUALCHAIN_SUMMARIZE_TRANSLATION",
                get("DUALCHAIN_SUMMARIZE_TRANSLATION"),
            )?,
            verbose: parse_flag("DUALCHAIN_VERBOSE", get("DUALCHAIN_VERBOSE"))?,
        })
    }
}

fn parse_flag(name: &str, value: Option<String>) -> Result<bool, ChainError> {
    let Some(raw) = value else {
        return Ok(false);
    };

    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ChainError::Config(format!(
            "{}: expected a boolean, got '{}'",
            name, other
        ))),
    }
}
