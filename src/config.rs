use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use openai_api::{FingerprintMode, OpenAIConfig, RetryPolicy};
use thiserror::Error;

const API_KEY: &str = "CHATBOT_OPENAI_API_KEY";
const BASE_URL: &str = "CHATBOT_OPENAI_BASE_URL";
const MODEL: &str = "CHATBOT_OPENAI_MODEL";
const INSTRUCTIONS: &str = "CHATBOT_OPENAI_INSTRUCTIONS";
const ASSISTANT_NAME: &str = "CHATBOT_OPENAI_ASSISTANT_NAME";
const STATE_DIR: &str = "CHATBOT_STATE_DIR";
const FINGERPRINT: &str = "CHATBOT_FINGERPRINT";
const POLL_MAX_ATTEMPTS: &str = "CHATBOT_POLL_MAX_ATTEMPTS";
const POLL_INTERVAL_MS: &str = "CHATBOT_POLL_INTERVAL_MS";
const BIND_ADDR: &str = "CHATBOT_BIND_ADDR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Expected env var: {0}")]
    Missing(&'static str),

    #[error("Invalid {name}={value}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug)]
pub struct Config {
    pub openai: OpenAIConfig,
    pub state_dir: PathBuf,
    pub fingerprint_mode: FingerprintMode,
    pub retry: RetryPolicy,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::Missing(API_KEY))?;

        let mut openai = OpenAIConfig::new(api_key);
        if let Some(base_url) = lookup(BASE_URL) {
            openai.base_url = base_url;
        }
        if let Some(model) = lookup(MODEL) {
            openai.model = model;
        }
        if let Some(instructions) = lookup(INSTRUCTIONS) {
            openai.instructions = instructions;
        }
        if let Some(name) = lookup(ASSISTANT_NAME) {
            openai.assistant_name = name;
        }

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            max_attempts: parse_or(&lookup, POLL_MAX_ATTEMPTS, defaults.max_attempts)?,
            interval: parse_or(&lookup, POLL_INTERVAL_MS, defaults.interval.as_millis() as u64)
                .map(Duration::from_millis)?,
        };

        Ok(Self {
            openai,
            state_dir: lookup(STATE_DIR).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
            fingerprint_mode: parse_or(&lookup, FINGERPRINT, FingerprintMode::default())?,
            retry,
            bind_addr: parse_or(&lookup, BIND_ADDR, SocketAddr::from(([0, 0, 0, 0], 3000)))?,
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}
