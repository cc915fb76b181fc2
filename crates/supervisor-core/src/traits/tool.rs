// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool backend trait for document, structured-data, and web lookups.

use async_trait::async_trait;

use crate::error::SupervisorError;

/// A tool that answers a free-text query.
///
/// Implementations report `ToolUnavailable` when their backing service
/// cannot be reached and `ToolExecution` when it ran but failed.
#[async_trait]
pub trait ToolBackend: Send + Sync {
    /// Returns the tool's configuration name (e.g. `document_retriever`).
    fn name(&self) -> &str;

    /// Executes the tool against the query and returns response text.
    async fn execute(&self, query: &str) -> Result<String, SupervisorError>;
}
