// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion provider trait backing the direct-answer handler.

use async_trait::async_trait;

use crate::error::SupervisorError;

/// Language model completion used to answer queries directly.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the provider's display name.
    fn name(&self) -> &str;

    /// Completes `query` under `system_prompt` and returns the response text.
    async fn complete(&self, system_prompt: &str, query: &str)
        -> Result<String, SupervisorError>;
}
