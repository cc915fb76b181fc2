// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Placeholder web search backend.

use async_trait::async_trait;
use supervisor_core::{ensure_query, SupervisorError, ToolBackend};

/// Deterministic web search stand-in, registered as `web_search`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSearchStub;

#[async_trait]
impl ToolBackend for WebSearchStub {
    fn name(&self) -> &str {
        "web_search"
    }

    async fn execute(&self, query: &str) -> Result<String, SupervisorError> {
        let query = ensure_query(query)?;
        Ok(format!(
            "Web search results for \"{query}\": [This is a stub response. \
             A live search provider is not configured.]"
        ))
    }
}
