// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Supervisor integration tests.
//!
//! Provides mock collaborators for fast, deterministic, CI-runnable tests
//! without network access or a real language model.
//!
//! # Components
//!
//! - [`MockCompletion`] - Direct-answer provider with queued responses
//! - [`MockToolBackend`] - Tool backend with a fixed reply, outage, failure, or delay
//! - [`MockRoutingModel`] - Decision model with queued replies, errors, or delay

pub mod mock_completion;
pub mod mock_routing_model;
pub mod mock_tool;

pub use mock_completion::MockCompletion;
pub use mock_routing_model::MockRoutingModel;
pub use mock_tool::MockToolBackend;
