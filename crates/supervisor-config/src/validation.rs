// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty keyword phrases, ordered ambiguity thresholds, and
//! non-zero timeouts.

use tracing::level_filters::LevelFilter;

use crate::diagnostic::ConfigError;
use crate::model::SupervisorConfig;

/// Tool names the router knows how to gate.
pub const KNOWN_TOOLS: [&str; 3] = ["document_retriever", "database_query", "web_search"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast). Unknown tool names
/// are logged and otherwise ignored.
pub fn validate_config(config: &SupervisorConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.system_prompt.trim().is_empty() {
        errors.push(validation("system_prompt must not be empty"));
    }

    if config.fallback_message.trim().is_empty() {
        errors.push(validation("fallback_message must not be empty"));
    }

    if config.log_level.parse::<LevelFilter>().is_err() {
        errors.push(validation(format!(
            "log_level `{}` is not one of trace, debug, info, warn, error, off",
            config.log_level
        )));
    }

    let rules = &config.routing_rules;
    for (key, entries) in [
        ("document_keywords", &rules.document_keywords),
        ("database_keywords", &rules.database_keywords),
        ("web_keywords", &rules.web_keywords),
        ("harmful_patterns", &rules.harmful_patterns),
    ] {
        for (index, entry) in entries.iter().enumerate() {
            if entry.trim().is_empty() {
                errors.push(validation(format!(
                    "routing_rules.{key}[{index}] must not be empty"
                )));
            }
        }
    }

    if rules.short_query_tokens > rules.weak_query_tokens {
        errors.push(validation(format!(
            "routing_rules.short_query_tokens ({}) must not exceed routing_rules.weak_query_tokens ({})",
            rules.short_query_tokens, rules.weak_query_tokens
        )));
    }

    if config.timeouts.escalation_ms == 0 {
        errors.push(validation("timeouts.escalation_ms must be greater than zero"));
    }

    if config.timeouts.handler_ms == 0 {
        errors.push(validation("timeouts.handler_ms must be greater than zero"));
    }

    if config.anthropic.max_tokens == 0 {
        errors.push(validation("anthropic.max_tokens must be greater than zero"));
    }

    if config.anthropic.routing_max_tokens == 0 {
        errors.push(validation(
            "anthropic.routing_max_tokens must be greater than zero",
        ));
    }

    for name in config.tools.keys() {
        if !KNOWN_TOOLS.contains(&name.as_str()) {
            tracing::warn!(tool = %name, "ignoring unknown tool in configuration");
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validation(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}
