// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decision model trait consulted for ambiguous queries.

use async_trait::async_trait;

use crate::error::SupervisorError;

/// Model-backed decision collaborator: one prompt in, one short answer out.
///
/// The answer is untrusted; callers validate it before acting on it.
#[async_trait]
pub trait RoutingModel: Send + Sync {
    /// Returns the model's display name.
    fn name(&self) -> &str;

    /// Sends the routing prompt and returns the raw reply.
    async fn decide(&self, prompt: &str) -> Result<String, SupervisorError>;
}
