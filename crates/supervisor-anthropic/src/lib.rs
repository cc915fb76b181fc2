// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude adapters for the Supervisor.
//!
//! [`AnthropicCompletion`] backs the direct-answer handler and retries
//! transient failures. [`AnthropicRoutingModel`] answers escalation prompts
//! with a small token budget and never retries, since the router bounds it
//! with its own timeout.

pub mod client;
pub mod types;

use async_trait::async_trait;
use supervisor_config::AnthropicConfig;
use supervisor_core::{CompletionProvider, RoutingModel, SupervisorError};
use tracing::info;

use crate::client::AnthropicClient;
use crate::types::MessageRequest;

/// Direct-answer provider backed by the Messages API.
pub struct AnthropicCompletion {
    client: AnthropicClient,
    model: String,
    max_tokens: u32,
}

impl AnthropicCompletion {
    /// Creates a provider from configuration.
    ///
    /// # API Key Resolution
    /// 1. `anthropic.api_key` if set and non-empty
    /// 2. `ANTHROPIC_API_KEY` environment variable
    /// 3. Returns error if neither is available
    pub fn new(config: &AnthropicConfig) -> Result<Self, SupervisorError> {
        let api_key = resolve_api_key(config.api_key.as_deref())?;
        let client = AnthropicClient::new(&api_key, &config.api_version)?
            .with_max_retries(config.max_retries);

        info!(model = %config.default_model, "Anthropic completion provider initialized");
        Ok(Self::with_client(
            client,
            config.default_model.clone(),
            config.max_tokens,
        ))
    }

    /// Creates a provider with an existing client.
    pub fn with_client(client: AnthropicClient, model: String, max_tokens: u32) -> Self {
        Self {
            client,
            model,
            max_tokens,
        }
    }
}

#[async_trait]
impl CompletionProvider for AnthropicCompletion {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, system_prompt: &str, query: &str) -> Result<String, SupervisorError> {
        let request = MessageRequest::single_turn(
            &self.model,
            Some(system_prompt.to_string()),
            query,
            self.max_tokens,
        );
        let response = self.client.complete_message(&request).await?;
        let text = response.text();
        if text.trim().is_empty() {
            return Err(SupervisorError::Provider {
                message: "Anthropic API returned no text content".into(),
                source: None,
            });
        }
        Ok(text)
    }
}

/// Escalation decision model backed by the Messages API.
pub struct AnthropicRoutingModel {
    client: AnthropicClient,
    model: String,
    max_tokens: u32,
}

impl AnthropicRoutingModel {
    /// Creates a routing model from configuration, with retries disabled.
    pub fn new(config: &AnthropicConfig) -> Result<Self, SupervisorError> {
        let api_key = resolve_api_key(config.api_key.as_deref())?;
        let client = AnthropicClient::new(&api_key, &config.api_version)?;

        info!(model = %config.routing_model, "Anthropic routing model initialized");
        Ok(Self::with_client(
            client,
            config.routing_model.clone(),
            config.routing_max_tokens,
        ))
    }

    /// Creates a routing model with an existing client. Retries are disabled.
    pub fn with_client(client: AnthropicClient, model: String, max_tokens: u32) -> Self {
        Self {
            client: client.with_max_retries(0),
            model,
            max_tokens,
        }
    }
}

#[async_trait]
impl RoutingModel for AnthropicRoutingModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn decide(&self, prompt: &str) -> Result<String, SupervisorError> {
        let request = MessageRequest::single_turn(&self.model, None, prompt, self.max_tokens);
        let response = self.client.complete_message(&request).await?;
        Ok(response.text().trim().to_string())
    }
}

/// Resolves the API key: configuration first, then `ANTHROPIC_API_KEY`.
pub fn resolve_api_key(config_key: Option<&str>) -> Result<String, SupervisorError> {
    resolve_api_key_with(config_key, |name| std::env::var(name).ok())
}

fn resolve_api_key_with(
    config_key: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String, SupervisorError> {
    if let Some(key) = config_key.filter(|k| !k.trim().is_empty()) {
        return Ok(key.to_string());
    }

    env("ANTHROPIC_API_KEY")
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            SupervisorError::Config(
                "Anthropic API key not found. Set anthropic.api_key in config or ANTHROPIC_API_KEY environment variable.".into(),
            )
        })
}
