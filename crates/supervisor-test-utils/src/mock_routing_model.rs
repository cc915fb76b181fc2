// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock decision model for escalation tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use supervisor_core::traits::RoutingModel;
use supervisor_core::SupervisorError;

/// A decision model that replays queued answers.
///
/// An exhausted queue fails like a transport error, so a test that escalates
/// more often than expected notices.
pub struct MockRoutingModel {
    replies: Arc<Mutex<VecDeque<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
    failing: bool,
}

impl MockRoutingModel {
    /// Replies with each queued answer in turn.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().map(Into::into).collect())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            delay: None,
            failing: false,
        }
    }

    /// Every call fails with a provider error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::with_replies(Vec::<String>::new())
        }
    }

    /// Sleeps for `delay` before answering `reply`.
    pub fn slow(delay: Duration, reply: impl Into<String>) -> Self {
        Self {
            delay: Some(delay),
            ..Self::with_replies([reply.into()])
        }
    }

    /// Prompts received so far.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    /// Number of decisions requested so far.
    pub async fn call_count(&self) -> usize {
        self.prompts.lock().await.len()
    }
}

#[async_trait]
impl RoutingModel for MockRoutingModel {
    fn name(&self) -> &str {
        "mock-routing-model"
    }

    async fn decide(&self, prompt: &str) -> Result<String, SupervisorError> {
        self.prompts.lock().await.push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing {
            return Err(SupervisorError::Provider {
                message: "mock routing model failure".into(),
                source: None,
            });
        }

        self.replies
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| SupervisorError::Provider {
                message: "no queued routing reply".into(),
                source: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_in_order_then_errors() {
        let model = MockRoutingModel::with_replies(["Web", "Direct"]);
        assert_eq!(model.decide("p").await.unwrap(), "Web");
        assert_eq!(model.decide("p").await.unwrap(), "Direct");
        assert!(model.decide("p").await.is_err());
        assert_eq!(model.call_count().await, 3);
    }

    #[tokio::test]
    async fn failing_model_errors() {
        let model = MockRoutingModel::failing();
        assert!(matches!(
            model.decide("p").await,
            Err(SupervisorError::Provider { .. })
        ));
    }
}
