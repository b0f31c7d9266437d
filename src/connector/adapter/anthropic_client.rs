use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::ChatClient;
use crate::domain::DomainError;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-haiku-4-5";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
const BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";
const MODEL_VAR: &str = "ANTHROPIC_MODEL";

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

/// Only `text` blocks carry text; anything else (thinking, tool use) is skipped.
#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Settings for [`AnthropicClient`], read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnthropicConfig {
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
}

impl AnthropicConfig {
    /// Fails with [`DomainError::Configuration`] when `api_key` is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self, DomainError> {
        let api_key: String = api_key.into();
        if api_key.trim().is_empty() {
            return Err(DomainError::configuration(format!(
                "{API_KEY_VAR} is empty"
            )));
        }
        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    /// Read configuration from the environment:
    ///
    /// | Variable             | Default                     | Purpose          |
    /// |----------------------|-----------------------------|------------------|
    /// | `ANTHROPIC_API_KEY`  | required                    | Credential       |
    /// | `ANTHROPIC_BASE_URL` | `https://api.anthropic.com` | Endpoint base    |
    /// | `ANTHROPIC_MODEL`    | `claude-haiku-4-5`          | Model identifier |
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`AnthropicConfig::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(API_KEY_VAR)
            .ok_or_else(|| DomainError::configuration(format!("{API_KEY_VAR} is not set")))?;
        let mut config = Self::new(key)?;

        if let Some(base) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(base);
        }
        if let Some(model) = lookup(MODEL_VAR).filter(|v| !v.trim().is_empty()) {
            config = config.with_model(model);
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

/// HTTP client for the Anthropic Messages API (and compatible endpoints such as
/// LM Studio).
///
/// Each prompt is sent as a single user turn. No timeout is applied: a request
/// resolves whenever the server answers or the connection fails.
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    /// Full endpoint URL (base + MESSAGES_PATH).
    url: String,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Self {
        let url = format!("{}{MESSAGES_PATH}", config.base_url.trim_end_matches('/'));
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key,
            model: config.model,
            max_tokens: config.max_tokens,
            url,
        }
    }

    pub fn from_env() -> Result<Self, DomainError> {
        AnthropicConfig::from_env().map(Self::new)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => format!("API returned {status}: {}", parsed.error.message),
            Err(_) => format!("API returned {status}"),
        }
    }
}

#[async_trait]
impl ChatClient for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        let request = ApiRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![ApiMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!("AnthropicClient: POST {} (model={})", self.url, self.model);

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::adapter(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("AnthropicClient: API returned {status}: {body}");
            return Err(DomainError::adapter(Self::describe_failure(status, &body)));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| DomainError::adapter(format!("failed to parse response: {e}")))?;

        let text: String = api_response
            .content
            .into_iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text)
            .collect();

        if text.trim().is_empty() {
            return Err(DomainError::EmptyResponse);
        }

        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = AnthropicConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("ANTHROPIC_API_KEY is not set"));
    }

    #[test]
    fn blank_key_is_a_configuration_error() {
        let err = AnthropicConfig::from_lookup(lookup(&[("ANTHROPIC_API_KEY", "  ")])).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = AnthropicConfig::from_lookup(lookup(&[("ANTHROPIC_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.max_tokens(), DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn env_overrides_model_and_base_url() {
        let config = AnthropicConfig::from_lookup(lookup(&[
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("ANTHROPIC_BASE_URL", "http://localhost:1234/"),
            ("ANTHROPIC_MODEL", "ministral-3b"),
        ]))
        .unwrap();

        let client = AnthropicClient::new(config);
        assert_eq!(client.url(), "http://localhost:1234/v1/messages");
        assert_eq!(client.model_name(), "ministral-3b");
    }

    #[test]
    fn describe_failure_prefers_service_message() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        let msg = AnthropicClient::describe_failure(reqwest::StatusCode::UNAUTHORIZED, body);
        assert_eq!(msg, "API returned 401 Unauthorized: invalid x-api-key");

        let msg = AnthropicClient::describe_failure(reqwest::StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(msg, "API returned 502 Bad Gateway");
    }
}
