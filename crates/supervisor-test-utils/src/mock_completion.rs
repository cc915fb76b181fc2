// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.
//!
//! `MockCompletion` implements `CompletionProvider` with pre-configured
//! responses and records every call so tests can assert on the system
//! prompt the direct handler used.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use supervisor_core::traits::CompletionProvider;
use supervisor_core::SupervisorError;

/// A mock completion provider that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty the
/// reply echoes the query as `mock answer: {query}`.
pub struct MockCompletion {
    responses: Arc<Mutex<VecDeque<String>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
    unreachable: bool,
}

impl MockCompletion {
    /// Create a new mock with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            unreachable: false,
        }
    }

    /// Create a mock pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            ..Self::new()
        }
    }

    /// Create a mock whose every call fails with a provider transport error.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::new()
        }
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(text.into());
    }

    /// Every `(system_prompt, query)` pair received so far.
    pub async fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().await.clone()
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletion {
    fn name(&self) -> &str {
        "mock-completion"
    }

    async fn complete(&self, system_prompt: &str, query: &str) -> Result<String, SupervisorError> {
        self.calls
            .lock()
            .await
            .push((system_prompt.to_string(), query.to_string()));

        if self.unreachable {
            return Err(SupervisorError::Provider {
                message: "mock completion unreachable".into(),
                source: None,
            });
        }

        Ok(self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| format!("mock answer: {query}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_then_echo() {
        let mock = MockCompletion::with_responses(vec!["first".into()]);
        assert_eq!(mock.complete("sys", "q1").await.unwrap(), "first");
        assert_eq!(mock.complete("sys", "q2").await.unwrap(), "mock answer: q2");
        assert_eq!(mock.calls().await.len(), 2);
    }

    #[tokio::test]
    async fn unreachable_reports_provider_error() {
        let mock = MockCompletion::unreachable();
        let err = mock.complete("sys", "q").await.unwrap_err();
        assert!(matches!(err, SupervisorError::Provider { .. }));
    }
}
