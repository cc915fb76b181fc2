// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Supervisor query router.
//!
//! This crate provides the routing categories, per-request result types,
//! the error taxonomy, and the collaborator traits that tool backends and
//! language model adapters implement.

pub mod error;
pub mod query;
pub mod traits;
pub mod types;

pub use error::SupervisorError;
pub use query::{ensure_query, log_excerpt};
pub use traits::{CompletionProvider, RoutingModel, ToolBackend};
pub use types::{Category, ClassificationResult, ClassificationSource, DispatchOutcome};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supervisor_error_has_all_variants() {
        let _input = SupervisorError::InvalidInput("test".into());
        let _config = SupervisorError::Config("test".into());
        let _unavailable = SupervisorError::unavailable("web_search", "down");
        let _execution = SupervisorError::ToolExecution {
            tool: "database_query".into(),
            message: "boom".into(),
            source: Some(Box::new(std::io::Error::other("disk"))),
        };
        let _provider = SupervisorError::Provider {
            message: "test".into(),
            source: None,
        };
        let _internal = SupervisorError::Internal("test".into());
    }

    #[test]
    fn ensure_query_rejects_blank_input() {
        assert!(matches!(ensure_query(""), Err(SupervisorError::InvalidInput(_))));
        assert!(matches!(ensure_query(" \t\n"), Err(SupervisorError::InvalidInput(_))));
        assert_eq!(ensure_query("  hi  ").unwrap(), "hi");
    }

    #[test]
    fn error_messages_name_the_tool() {
        let err = SupervisorError::unavailable("document_retriever", "connection refused");
        assert_eq!(
            err.to_string(),
            "tool `document_retriever` unavailable: connection refused"
        );
    }

    #[test]
    fn all_collaborator_traits_are_exported() {
        fn _assert_tool<T: ToolBackend>() {}
        fn _assert_completion<T: CompletionProvider>() {}
        fn _assert_routing<T: RoutingModel>() {}
    }
}
