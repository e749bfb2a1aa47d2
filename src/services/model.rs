// src/services/model.rs

//! Language model seam.
//!
//! The structurer only sees [`LanguageModel`]; [`OpenAiClient`] is the
//! default implementation against an OpenAI-compatible chat completions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::models::ModelConfig;

/// One chat completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    /// Ask the model for a JSON object reply
    pub json_mode: bool,
}

/// Opaque text-in, text-out model call.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete a request, returning the raw reply text.
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}

/// Chat completions client for OpenAI-compatible endpoints.
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(client: Client, config: &ModelConfig, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            model: config.name.clone(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Build a client whose key comes from the configured environment variable.
    pub fn from_config(client: Client, config: &ModelConfig) -> Result<Self> {
        let api_key = config.api_key()?;
        Ok(Self::new(client, config, api_key))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| AppError::config(format!("Invalid API key header: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let mut payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user }
            ]
        });
        if request.json_mode {
            payload["response_format"] = json!({ "type": "json_object" });
        }

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers()?)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::model(format!("{status}: {body}")));
        }

        let result = response.json::<Value>().await?;
        result["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::model("reply has no message content"))
    }
}
