use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::LlmConfig;
use crate::errors::LlmError;
use crate::models::ModelInfo;

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion from a single user prompt
    async fn generate_completion(&self, prompt: String) -> Result<String, LlmError>;
}

/// OpenAI API request/response structures
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
}

#[derive(Debug, Serialize, Clone)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Chat-completion provider speaking the OpenAI wire format.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    endpoint: String,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String, base_url: &str, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        Ok(Self {
            api_key,
            model,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            client,
        })
    }

    async fn call_openai(&self, request: &OpenAiRequest) -> Result<OpenAiResponse, LlmError> {
        let response = self.client
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

        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("OpenAI API call failed with HTTP {}", status);
            return Err(LlmError::ApiError(format!("HTTP {}: {}", status, error_text)));
        }

        response.json::<OpenAiResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}

fn first_choice_content(response: OpenAiResponse) -> Result<String, LlmError> {
    response.choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?
        .message
        .content
        .ok_or_else(|| LlmError::InvalidResponse("Empty message content".to_string()))
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate_completion(&self, prompt: String) -> Result<String, LlmError> {
        info!("Generating LLM completion (model: {})", self.model);

        let request = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![OpenAiMessage {
                role: "user".to_string(),
                content: prompt,
            }],
        };

        let response = self.call_openai(&request).await?;

        if let Some(usage) = &response.usage {
            info!("LLM completion generated. Tokens: {} prompt + {} completion = {} total",
                  usage.prompt_tokens, usage.completion_tokens, usage.total_tokens);
        }

        first_choice_content(response)
    }
}

/// LLM service wrapping an optional provider. Without a credential the
/// service stays disabled and callers fall back to a placeholder insight.
pub struct LlmService {
    config: LlmConfig,
    provider: Option<Arc<dyn LlmProvider>>,
}

impl LlmService {
    pub fn new(config: LlmConfig) -> Self {
        let provider = match config.api_key.as_deref() {
            Some(api_key) => {
                match OpenAiProvider::new(api_key.to_string(), config.model.clone(), &config.base_url, config.timeout) {
                    Ok(provider) => {
                        info!("Initializing LLM service with provider: {} (model: {})", config.provider, config.model);
                        Some(Arc::new(provider) as Arc<dyn LlmProvider>)
                    }
                    Err(e) => {
                        warn!("Failed to build LLM client: {}. LLM features disabled.", e);
                        None
                    }
                }
            }
            None => {
                warn!("LLM API key not configured. LLM features disabled.");
                None
            }
        };

        Self { config, provider }
    }

    #[cfg(test)]
    pub fn with_provider(config: LlmConfig, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            config,
            provider: Some(provider),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: self.config.provider.clone(),
            name: self.config.model.clone(),
        }
    }

    pub async fn generate_completion(&self, prompt: String) -> Result<String, LlmError> {
        let provider = self.provider.as_ref()
            .ok_or(LlmError::Disabled)?;

        provider.generate_completion(prompt).await
    }
}
