// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the router and dispatcher depend on.
//!
//! Every collaborator is injected as an `Arc<dyn Trait>` and uses
//! `#[async_trait]` for dynamic dispatch compatibility. Implementations own
//! their own transport, credentials, and retry policy.

pub mod completion;
pub mod routing;
pub mod tool;

pub use completion::CompletionProvider;
pub use routing::RoutingModel;
pub use tool::ToolBackend;
