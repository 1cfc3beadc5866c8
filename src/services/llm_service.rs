use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::errors::LlmError;

/// Configuration for the text-completion provider
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API; `/chat/completions` is appended
    pub base_url: String,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub cache_ttl_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: "https://api.perplexity.ai".to_string(),
            model: "sonar".to_string(),
            max_tokens: 200,
            temperature: 0.7,
            timeout_secs: 30,
            max_retries: 3,
            cache_ttl_secs: 3600,
        }
    }
}

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for `prompt` under the given system instruction
    async fn generate_completion(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

/// Chat-completions request/response structures
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Serialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Provider for any OpenAI-compatible chat-completions endpoint
/// (Perplexity, OpenAI, local gateways).
pub struct ChatCompletionsProvider {
    api_key: String,
    endpoint: String,
    model: String,
    max_tokens: usize,
    temperature: f32,
    max_retries: u32,
    client: Client,
}

impl ChatCompletionsProvider {
    pub fn new(api_key: String, config: &LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            max_retries: config.max_retries.max(1),
            client,
        }
    }

    async fn call_with_retry(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let mut attempt = 0;
        let mut delay = Duration::from_secs(1);

        loop {
            attempt += 1;
            match self.call(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    warn!(
                        "LLM API call failed (attempt {}/{}): {}. Retrying in {:?}...",
                        attempt, self.max_retries, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2; // 1s, 2s, 4s
                }
                Err(e) => {
                    error!("LLM API call failed after {} attempt(s): {}", attempt, e);
                    return Err(e);
                }
            }
        }
    }

    async fn call(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited);
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LlmProvider for ChatCompletionsProvider {
    async fn generate_completion(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        info!("Generating LLM completion (model: {}, max_tokens: {})", self.model, self.max_tokens);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self.call_with_retry(&request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?
            .message
            .content;

        if let Some(usage) = response.usage {
            info!(
                "LLM completion generated. Tokens: {} prompt + {} completion = {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(content)
    }
}

/// Cached response with expiration
#[derive(Debug, Clone)]
struct CachedResponse {
    content: String,
    created_at: Instant,
}

/// LLM response cache with TTL
pub struct LlmCache {
    cache: Arc<RwLock<HashMap<String, CachedResponse>>>,
    ttl: Duration,
}

impl LlmCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let cache = self.cache.read().await;
        cache
            .get(key)
            .filter(|cached| cached.created_at.elapsed() < self.ttl)
            .map(|cached| cached.content.clone())
    }

    pub async fn set(&self, key: String, value: String) {
        let mut cache = self.cache.write().await;
        cache.retain(|_, v| v.created_at.elapsed() < self.ttl);
        cache.insert(
            key,
            CachedResponse {
                content: value,
                created_at: Instant::now(),
            },
        );
    }
}

/// Text completion with provider abstraction and caching
pub struct LlmService {
    provider: Option<Arc<dyn LlmProvider>>,
    unavailable: LlmUnavailable,
    cache: LlmCache,
}

#[derive(Debug, Clone, Copy)]
enum LlmUnavailable {
    Disabled,
    MissingApiKey,
}

impl LlmService {
    pub fn new(config: LlmConfig) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_secs);

        if !config.enabled {
            info!("LLM features are disabled in configuration");
            return Self::unavailable(LlmUnavailable::Disabled, ttl);
        }

        match config.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(api_key) => {
                info!("Initializing LLM service (endpoint: {}, model: {})", config.base_url, config.model);
                let provider = ChatCompletionsProvider::new(api_key.to_string(), &config);
                Self::with_provider(Arc::new(provider), ttl)
            }
            None => {
                warn!("LLM API key not configured. Suggestions will carry a diagnostic instead.");
                Self::unavailable(LlmUnavailable::MissingApiKey, ttl)
            }
        }
    }

    /// Use an already-built provider, e.g. a test double.
    pub fn with_provider(provider: Arc<dyn LlmProvider>, ttl: Duration) -> Self {
        Self {
            provider: Some(provider),
            unavailable: LlmUnavailable::Disabled,
            cache: LlmCache::new(ttl),
        }
    }

    fn unavailable(reason: LlmUnavailable, ttl: Duration) -> Self {
        Self {
            provider: None,
            unavailable: reason,
            cache: LlmCache::new(ttl),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Generate a completion, serving repeated prompts from the cache
    pub async fn generate_completion(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let provider = self.provider.as_ref().ok_or(match self.unavailable {
            LlmUnavailable::Disabled => LlmError::Disabled,
            LlmUnavailable::MissingApiKey => LlmError::MissingApiKey,
        })?;

        let cache_key = Self::hash_prompt(system, prompt);
        if let Some(cached) = self.cache.get(&cache_key).await {
            info!("LLM cache hit ({})", cache_key);
            return Ok(cached);
        }

        let result = provider.generate_completion(system, prompt).await?;
        self.cache.set(cache_key, result.clone()).await;

        Ok(result)
    }

    fn hash_prompt(system: &str, prompt: &str) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        system.hash(&mut hasher);
        prompt.hash(&mut hasher);
        format!("completion:{:x}", hasher.finish())
    }
}
