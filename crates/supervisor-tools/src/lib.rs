// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in collaborators for the Supervisor.
//!
//! Each tool backend reports its configuration name through
//! [`ToolBackend::name`](supervisor_core::ToolBackend::name), which is how the
//! dispatcher pairs it with a routing category.

pub mod database;
pub mod document;
pub mod offline;
pub mod web;

use std::sync::Arc;

use supervisor_core::{SupervisorError, ToolBackend};

pub use database::{Metric, MetricsDatabase};
pub use document::{Document, DocumentStore};
pub use offline::OfflineCompletion;
pub use web::WebSearchStub;

/// All built-in tool backends, ready to hand to the supervisor.
pub async fn builtin_tools() -> Result<Vec<Arc<dyn ToolBackend>>, SupervisorError> {
    Ok(vec![
        Arc::new(DocumentStore::builtin()),
        Arc::new(MetricsDatabase::open_in_memory().await?),
        Arc::new(WebSearchStub),
    ])
}
