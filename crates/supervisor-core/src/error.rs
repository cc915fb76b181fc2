// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Supervisor query router.

use thiserror::Error;

/// The primary error type surfaced by classification, dispatch, and collaborators.
///
/// Only `InvalidInput`, `Config`, `ToolUnavailable`, and `ToolExecution` ever
/// reach the end caller from the request pipeline. `Provider` is what a
/// collaborator reports for transport failures; the dispatcher folds it into
/// `ToolUnavailable` before returning.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// Empty or whitespace-only query, or a malformed rule set.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// The resolved tool cannot be reached, has no registered handler, or timed out.
    #[error("tool `{tool}` unavailable: {reason}")]
    ToolUnavailable { tool: String, reason: String },

    /// The tool ran but failed internally.
    #[error("tool `{tool}` failed: {message}")]
    ToolExecution {
        tool: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Language model transport or protocol failure.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SupervisorError {
    /// Shorthand for an unavailable-tool error.
    pub fn unavailable(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ToolUnavailable {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a tool execution error without an underlying cause.
    pub fn execution(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool: tool.into(),
            message: message.into(),
            source: None,
        }
    }
}
