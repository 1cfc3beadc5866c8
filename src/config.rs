use std::net::SocketAddr;
use std::str::FromStr;

use crate::errors::ConfigError;
use crate::logging::LoggingConfig;
use crate::services::llm_service::LlmConfig;

/// Price data provider settings
#[derive(Debug, Clone)]
pub struct PriceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Everything the service needs at startup, read once from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub price: PriceConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host: String = env_or("HOST", "0.0.0.0".to_string())?;
        let port: u16 = env_or("PORT", 8000)?;
        let bind_addr = format!("{}:{}", host, port)
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "HOST".to_string(),
                value: host.clone(),
                reason: e.to_string(),
            })?;

        let price_defaults = PriceConfig::default();
        let price = PriceConfig {
            base_url: env_or("YAHOO_BASE_URL", price_defaults.base_url)?,
            timeout_secs: env_or("PRICE_TIMEOUT_SECS", price_defaults.timeout_secs)?,
        };

        let llm_defaults = LlmConfig::default();
        let api_key = non_empty_env("LLM_API_KEY").or_else(|| non_empty_env("PERPLEXITY_API_KEY"));
        let llm = LlmConfig {
            enabled: env_or("LLM_ENABLED", llm_defaults.enabled)?,
            api_key,
            base_url: env_or("LLM_BASE_URL", llm_defaults.base_url)?,
            model: env_or("LLM_MODEL", llm_defaults.model)?,
            max_tokens: env_or("LLM_MAX_TOKENS", llm_defaults.max_tokens)?,
            temperature: env_or("LLM_TEMPERATURE", llm_defaults.temperature)?,
            timeout_secs: env_or("LLM_TIMEOUT_SECS", llm_defaults.timeout_secs)?,
            max_retries: env_or("LLM_MAX_RETRIES", llm_defaults.max_retries)?,
            cache_ttl_secs: env_or("LLM_CACHE_TTL_SECS", llm_defaults.cache_ttl_secs)?,
        };

        Ok(Self {
            bind_addr,
            database_url: non_empty_env("DATABASE_URL"),
            price,
            llm,
            logging: LoggingConfig::from_env(),
        })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Read `key` and parse it, falling back to `default` when unset or blank.
fn env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty_env(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key: key.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
