// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Supervisor query router.
//!
//! Sections use `#[serde(deny_unknown_fields)]` to reject unrecognized keys
//! at startup. Per-tool tables are the exception: they may carry
//! tool-specific settings the router does not read.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level Supervisor configuration.
///
/// Field names match the legacy `config.json` layout so existing JSON
/// configuration files load unchanged.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SupervisorConfig {
    /// System prompt for direct language model answers.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Message returned for refused queries.
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Tool tables keyed by tool name (`document_retriever`, `database_query`, `web_search`).
    /// A tool missing from this map is disabled.
    #[serde(default)]
    pub tools: BTreeMap<String, ToolConfig>,

    /// Keyword routing rules.
    #[serde(default)]
    pub routing_rules: RoutingRulesConfig,

    /// Bounds on external calls.
    #[serde(default)]
    pub timeouts: TimeoutsConfig,

    /// Anthropic API settings for direct answers and escalation.
    #[serde(default)]
    pub anthropic: AnthropicConfig,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            fallback_message: default_fallback_message(),
            log_level: default_log_level(),
            tools: BTreeMap::new(),
            routing_rules: RoutingRulesConfig::default(),
            timeouts: TimeoutsConfig::default(),
            anthropic: AnthropicConfig::default(),
        }
    }
}

impl SupervisorConfig {
    /// Whether the named tool is present and enabled.
    pub fn is_tool_enabled(&self, name: &str) -> bool {
        self.tools.get(name).is_some_and(|t| t.enabled)
    }
}

fn default_system_prompt() -> String {
    "You are a helpful AI assistant. Answer clearly and concisely.".to_string()
}

fn default_fallback_message() -> String {
    "I'm sorry, I'm not sure how to help with that request. Please rephrase your question."
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Configuration for a single tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToolConfig {
    /// Whether the router may send queries to this tool.
    pub enabled: bool,

    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ToolConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            description: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            description: None,
        }
    }
}

/// Keyword routing rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingRulesConfig {
    /// Phrases that route to the document retriever.
    #[serde(default = "default_document_keywords")]
    pub document_keywords: Vec<String>,

    /// Phrases that route to the database query tool.
    #[serde(default = "default_database_keywords")]
    pub database_keywords: Vec<String>,

    /// Phrases that route to web search.
    #[serde(default = "default_web_keywords")]
    pub web_keywords: Vec<String>,

    /// Whole-token patterns that force a refusal.
    #[serde(default = "default_harmful_patterns")]
    pub harmful_patterns: Vec<String>,

    /// Consult the language model when keyword routing is ambiguous.
    #[serde(default)]
    pub enable_llm_fallback: bool,

    /// Queries with no keyword match and fewer tokens than this are ambiguous.
    #[serde(default = "default_short_query_tokens")]
    pub short_query_tokens: usize,

    /// Queries with no keyword match and fewer tokens than this are weakly ambiguous.
    #[serde(default = "default_weak_query_tokens")]
    pub weak_query_tokens: usize,
}

impl Default for RoutingRulesConfig {
    fn default() -> Self {
        Self {
            document_keywords: default_document_keywords(),
            database_keywords: default_database_keywords(),
            web_keywords: default_web_keywords(),
            harmful_patterns: default_harmful_patterns(),
            enable_llm_fallback: false,
            short_query_tokens: default_short_query_tokens(),
            weak_query_tokens: default_weak_query_tokens(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_document_keywords() -> Vec<String> {
    strings(&["according to", "project plan", "design document", "policy", "document"])
}

fn default_database_keywords() -> Vec<String> {
    strings(&["how many", "accounts", "revenue", "sales", "metrics"])
}

fn default_web_keywords() -> Vec<String> {
    strings(&["latest", "news", "current events", "search the web"])
}

fn default_harmful_patterns() -> Vec<String> {
    strings(&["DROP", "DELETE", "TRUNCATE", "ALTER"])
}

fn default_short_query_tokens() -> usize {
    3
}

fn default_weak_query_tokens() -> usize {
    5
}

/// Bounds on external calls, in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutsConfig {
    /// Upper bound on a single escalation (secondary classifier) call.
    #[serde(default = "default_escalation_ms")]
    pub escalation_ms: u64,

    /// Upper bound on a single handler call.
    #[serde(default = "default_handler_ms")]
    pub handler_ms: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            escalation_ms: default_escalation_ms(),
            handler_ms: default_handler_ms(),
        }
    }
}

fn default_escalation_ms() -> u64 {
    5_000
}

fn default_handler_ms() -> u64 {
    30_000
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` falls back to the `ANTHROPIC_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Anthropic API version header value.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Model used for direct answers.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Model used for escalated routing decisions.
    #[serde(default = "default_routing_model")]
    pub routing_model: String,

    /// Max tokens for direct answers.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Max tokens for routing decisions (a single category name).
    #[serde(default = "default_routing_max_tokens")]
    pub routing_max_tokens: u32,

    /// Retries on transient API errors for direct answers. Routing calls never retry.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_version: default_api_version(),
            default_model: default_model(),
            routing_model: default_routing_model(),
            max_tokens: default_max_tokens(),
            routing_max_tokens: default_routing_max_tokens(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_model() -> String {
    "claude-3-5-haiku-20241022".to_string()
}

fn default_routing_model() -> String {
    "claude-3-5-haiku-20241022".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_routing_max_tokens() -> u32 {
    10
}

fn default_max_retries() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_is_disabled() {
        let config = SupervisorConfig::default();
        assert!(!config.is_tool_enabled("document_retriever"));
    }

    #[test]
    fn tool_tables_tolerate_extra_keys() {
        let toml_str = r#"
[tools.document_retriever]
enabled = true
description = "Internal docs"
index = "sharepoint"
"#;
        let config: SupervisorConfig = toml::from_str(toml_str).unwrap();
        assert!(config.is_tool_enabled("document_retriever"));
        assert_eq!(
            config.tools["document_retriever"].description.as_deref(),
            Some("Internal docs")
        );
    }

    #[test]
    fn tool_enabled_flag_is_required() {
        let toml_str = r#"
[tools.web_search]
description = "Search"
"#;
        assert!(toml::from_str::<SupervisorConfig>(toml_str).is_err());
    }

    #[test]
    fn routing_rules_deny_unknown_fields() {
        let toml_str = r#"
[routing_rules]
web_keyword = ["news"]
"#;
        assert!(toml::from_str::<SupervisorConfig>(toml_str).is_err());
    }

    #[test]
    fn escalation_disabled_by_default() {
        let rules = RoutingRulesConfig::default();
        assert!(!rules.enable_llm_fallback);
        assert_eq!(rules.short_query_tokens, 3);
        assert_eq!(rules.weak_query_tokens, 5);
    }
}
