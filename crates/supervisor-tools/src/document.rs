// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory internal document store.

use async_trait::async_trait;
use supervisor_core::{ensure_query, SupervisorError, ToolBackend};
use tracing::debug;

/// Reply when no document matches the query.
pub const DOCUMENT_NOT_FOUND: &str = "Document not found.";

/// One stored document.
#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub content: String,
    /// Groups of words that identify the document when its title is not
    /// quoted verbatim. A group matches when its first word and any of the
    /// remaining words all appear in the query.
    aliases: Vec<Vec<String>>,
}

impl Document {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            aliases: Vec::new(),
        }
    }

    /// Adds a partial-match rule: `anchor` plus at least one of `any_of`.
    pub fn with_alias(mut self, anchor: &str, any_of: &[&str]) -> Self {
        let mut group = vec![anchor.to_lowercase()];
        group.extend(any_of.iter().map(|w| w.to_lowercase()));
        self.aliases.push(group);
        self
    }

    fn matches_alias(&self, query_lower: &str) -> bool {
        self.aliases.iter().any(|group| match group.split_first() {
            Some((anchor, rest)) => {
                query_lower.contains(anchor.as_str())
                    && rest.iter().any(|w| query_lower.contains(w.as_str()))
            }
            None => false,
        })
    }
}

/// Document lookup backend, registered as `document_retriever`.
///
/// Lookup tries an exact (case-insensitive) title mention first across all
/// documents, then the partial-match aliases in insertion order.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    documents: Vec<Document>,
}

impl DocumentStore {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// The built-in internal documents.
    pub fn builtin() -> Self {
        Self::new(vec![
            Document::new(
                "Q3 Project Plan",
                "According to the Q3 Project Plan, the deadline is October 31, 2025. \
                 The project includes milestone reviews in September and October. \
                 Key deliverables must be completed by the end of Q3.",
            )
            .with_alias("q3", &["plan", "project"]),
            Document::new(
                "Design Document",
                "The design document specifies the authentication flow requirements. \
                 Users must authenticate using OAuth 2.0 with Azure AD integration. \
                 MFA is required for all administrative access.",
            )
            .with_alias("design", &["doc", "document"]),
            Document::new(
                "Security Policy",
                "The security policy mandates encryption at rest and in transit. \
                 All data must be classified according to sensitivity levels. \
                 Access controls follow the principle of least privilege.",
            )
            .with_alias("security", &["policy"]),
        ])
    }

    /// Finds the document a query refers to.
    pub fn search(&self, query: &str) -> Option<&Document> {
        let query_lower = query.to_lowercase();
        self.documents
            .iter()
            .find(|d| query_lower.contains(&d.title.to_lowercase()))
            .or_else(|| self.documents.iter().find(|d| d.matches_alias(&query_lower)))
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::builtin()
    }
}

#[async_trait]
impl ToolBackend for DocumentStore {
    fn name(&self) -> &str {
        "document_retriever"
    }

    async fn execute(&self, query: &str) -> Result<String, SupervisorError> {
        let query = ensure_query(query)?;
        match self.search(query) {
            Some(doc) => {
                debug!(title = %doc.title, "document matched");
                Ok(doc.content.clone())
            }
            None => Ok(DOCUMENT_NOT_FOUND.to_string()),
        }
    }
}
