// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Uniform handler capability over the external collaborators.

use std::sync::Arc;

use async_trait::async_trait;
use supervisor_core::{Category, CompletionProvider, SupervisorError, ToolBackend};
use supervisor_router::RuleSet;

/// Produces the response for one resolved category.
#[async_trait]
pub trait Handler: Send + Sync {
    /// The category this handler serves.
    fn category(&self) -> Category;

    /// Answer `query` under the request's rule snapshot.
    async fn handle(&self, query: &str, rules: &RuleSet) -> Result<String, SupervisorError>;
}

/// Answers directly with a language model.
///
/// The system prompt comes from the request's [`RuleSet`], so it always
/// matches the rules the request was routed with.
pub struct DirectHandler {
    provider: Arc<dyn CompletionProvider>,
}

impl DirectHandler {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Handler for DirectHandler {
    fn category(&self) -> Category {
        Category::Direct
    }

    async fn handle(&self, query: &str, rules: &RuleSet) -> Result<String, SupervisorError> {
        self.provider.complete(rules.system_prompt(), query).await
    }
}

/// Adapts a [`ToolBackend`] to the handler capability.
pub struct ToolHandler {
    category: Category,
    backend: Arc<dyn ToolBackend>,
}

impl ToolHandler {
    /// Wraps `backend` for the category its name maps to.
    ///
    /// Fails with `Config` when the backend name has no routing category.
    pub fn new(backend: Arc<dyn ToolBackend>) -> Result<Self, SupervisorError> {
        let category = Category::from_tool_name(backend.name()).ok_or_else(|| {
            SupervisorError::Config(format!(
                "tool backend `{}` has no routing category",
                backend.name()
            ))
        })?;
        Ok(Self { category, backend })
    }
}

#[async_trait]
impl Handler for ToolHandler {
    fn category(&self) -> Category {
        self.category
    }

    async fn handle(&self, query: &str, _rules: &RuleSet) -> Result<String, SupervisorError> {
        self.backend.execute(query).await
    }
}
