//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `HOST` - bind address (default: `0.0.0.0`)
//! - `PORT` - HTTP port (default: `8000`)
//! - `CORS_ALLOWED_ORIGINS` - comma-separated origins (default: `http://localhost:3000`)
//! - `CREWAI_LLM` or `OPENAI_MODEL_NAME` - model, optionally `provider/model`
//!   (default: `openai/gpt-4o-mini`)
//! - `OPENAI_API_KEY` - API key for the OpenAI provider
//! - `OPENAI_API_BASE` or `OPENAI_BASE_URL` - OpenAI-compatible base URL
//! - `OPENAI_ORGANIZATION` - sent as the `OpenAI-Organization` header
//! - `LLM_TIMEOUT_SECS` - per-request timeout, at least 1 (default: 120)
//! - `LLM_MAX_RETRIES` - retries after the first attempt (default: 2)
//! - `LLM_TEMPERATURE` - sampling temperature (provider default when unset)
//! - `LLM_MAX_TOKENS` - completion token limit (provider default when unset)

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::llms::base_llm::DEFAULT_MODEL;
use crate::llms::providers::openai::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};
use crate::utilities::errors::ConfigError;

/// Default CORS origin (the front-end dev server).
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Tracing filter used when `RUST_LOG` is unset. Records of non-verbose
/// crews and agents are logged at debug and stay hidden under it.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Settings used to build the service-wide LLM.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Model string, optionally prefixed with a provider (`openai/gpt-4o`).
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub organization: Option<String>,
    pub timeout: Duration,
    pub max_retries: u32,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: None,
            organization: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Full service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub llm: LlmSettings,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            llm: LlmSettings::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Load configuration from an explicit variable map.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let cors_origins = match get("CORS_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            None => defaults.cors_origins,
        };

        let llm = LlmSettings {
            model: get("CREWAI_LLM")
                .or_else(|| get("OPENAI_MODEL_NAME"))
                .unwrap_or(defaults.llm.model),
            api_key: get("OPENAI_API_KEY"),
            base_url: get("OPENAI_API_BASE").or_else(|| get("OPENAI_BASE_URL")),
            organization: get("OPENAI_ORGANIZATION"),
            timeout: match get("LLM_TIMEOUT_SECS") {
                Some(raw) => Duration::from_secs(parse_positive("LLM_TIMEOUT_SECS", &raw)?),
                None => defaults.llm.timeout,
            },
            max_retries: match get("LLM_MAX_RETRIES") {
                Some(raw) => parse_var("LLM_MAX_RETRIES", &raw)?,
                None => defaults.llm.max_retries,
            },
            temperature: get("LLM_TEMPERATURE")
                .map(|raw| parse_var("LLM_TEMPERATURE", &raw))
                .transpose()?,
            max_tokens: get("LLM_MAX_TOKENS")
                .map(|raw| parse_positive("LLM_MAX_TOKENS", &raw))
                .transpose()?,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: match get("PORT") {
                Some(raw) => parse_var("PORT", &raw)?,
                None => defaults.port,
            },
            cors_origins,
            llm,
        })
    }

    /// The `host:port` string to bind the listener to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_positive<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr + Default + PartialEq,
    T::Err: std::fmt::Display,
{
    let value: T = parse_var(key, raw)?;
    if value == T::default() {
        return Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}
