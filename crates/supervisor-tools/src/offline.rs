// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Direct responder used when no model credentials are configured.

use async_trait::async_trait;
use supervisor_core::{CompletionProvider, SupervisorError};

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCompletion;

#[async_trait]
impl CompletionProvider for OfflineCompletion {
    fn name(&self) -> &str {
        "offline"
    }

    async fn complete(&self, _system_prompt: &str, query: &str) -> Result<String, SupervisorError> {
        Ok(format!("[Stub Claude API Response] Received query: {query}"))
    }
}
