// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock tool backend with scriptable behavior.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use supervisor_core::traits::ToolBackend;
use supervisor_core::SupervisorError;

#[derive(Debug, Clone)]
enum Behavior {
    Reply(String),
    Unavailable(String),
    Failing(String),
    Slow(Duration, String),
}

/// A tool backend that replies, fails, or stalls on demand and records
/// every query it receives.
pub struct MockToolBackend {
    name: String,
    behavior: Behavior,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockToolBackend {
    fn with_behavior(name: &str, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always returns `reply`.
    pub fn replying(name: &str, reply: impl Into<String>) -> Self {
        Self::with_behavior(name, Behavior::Reply(reply.into()))
    }

    /// Always fails with `ToolUnavailable`.
    pub fn unavailable(name: &str, reason: impl Into<String>) -> Self {
        Self::with_behavior(name, Behavior::Unavailable(reason.into()))
    }

    /// Always fails with `ToolExecution` carrying an I/O error as its source.
    pub fn failing(name: &str, message: impl Into<String>) -> Self {
        Self::with_behavior(name, Behavior::Failing(message.into()))
    }

    /// Sleeps for `delay` before returning `reply`.
    pub fn slow(name: &str, delay: Duration, reply: impl Into<String>) -> Self {
        Self::with_behavior(name, Behavior::Slow(delay, reply.into()))
    }

    /// Queries received so far, in call order.
    pub async fn queries(&self) -> Vec<String> {
        self.queries.lock().await.clone()
    }

    /// Number of calls received so far.
    pub async fn call_count(&self) -> usize {
        self.queries.lock().await.len()
    }
}

#[async_trait]
impl ToolBackend for MockToolBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, query: &str) -> Result<String, SupervisorError> {
        self.queries.lock().await.push(query.to_string());

        match &self.behavior {
            Behavior::Reply(reply) => Ok(reply.clone()),
            Behavior::Unavailable(reason) => {
                Err(SupervisorError::unavailable(&self.name, reason.clone()))
            }
            Behavior::Failing(message) => Err(SupervisorError::ToolExecution {
                tool: self.name.clone(),
                message: message.clone(),
                source: Some(Box::new(std::io::Error::other(message.clone()))),
            }),
            Behavior::Slow(delay, reply) => {
                tokio::time::sleep(*delay).await;
                Ok(reply.clone())
            }
        }
    }
}
