// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing categories and per-request result types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Closed set of routing outcomes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    /// Answered by the language model without any tool.
    Direct,
    /// Internal document lookup.
    Document,
    /// Structured-data (database) lookup.
    Structured,
    /// Web lookup.
    Web,
    /// Terminal refusal carrying the configured message.
    Refuse,
}

impl Category {
    /// Tool categories in keyword priority order.
    pub const TOOL_PRIORITY: [Category; 3] =
        [Category::Document, Category::Structured, Category::Web];

    /// Categories a secondary classifier is allowed to suggest.
    pub const SUGGESTABLE: [Category; 4] = [
        Category::Direct,
        Category::Document,
        Category::Structured,
        Category::Web,
    ];

    /// Configuration tool name gating this category, if any.
    ///
    /// `Direct` and `Refuse` are never gated.
    pub fn tool_name(self) -> Option<&'static str> {
        match self {
            Category::Document => Some("document_retriever"),
            Category::Structured => Some("database_query"),
            Category::Web => Some("web_search"),
            Category::Direct | Category::Refuse => None,
        }
    }

    /// Maps a configuration tool name back to its category.
    pub fn from_tool_name(name: &str) -> Option<Category> {
        Category::TOOL_PRIORITY
            .into_iter()
            .find(|c| c.tool_name() == Some(name))
    }

    /// Whether enablement flags apply to this category.
    pub fn is_gated(self) -> bool {
        self.tool_name().is_some()
    }

    /// Label used in logs and error messages for the handler behind this category.
    pub fn handler_label(self) -> &'static str {
        match self {
            Category::Direct => "direct_llm",
            Category::Refuse => "refusal",
            other => other.tool_name().unwrap_or("unknown"),
        }
    }
}

/// How a classification was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum ClassificationSource {
    /// A keyword or disallowed-pattern rule decided.
    Keyword,
    /// The secondary classifier's validated suggestion decided.
    Escalated,
    /// Nothing usable matched; defaulted to `Direct`.
    Default,
}

/// Outcome of classifying a single query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// The category the request should be dispatched to.
    pub primary: Category,
    /// Every tool category whose keywords matched, enabled or not.
    pub matched: BTreeSet<Category>,
    /// Which rule produced `primary`.
    pub source: ClassificationSource,
}

impl ClassificationResult {
    /// Refusal produced by a disallowed-pattern match.
    pub fn refuse() -> Self {
        Self {
            primary: Category::Refuse,
            matched: BTreeSet::new(),
            source: ClassificationSource::Keyword,
        }
    }

    pub fn is_refusal(&self) -> bool {
        self.primary == Category::Refuse
    }
}

/// Successful dispatch result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    /// Category whose handler produced the response.
    pub handler_used: Category,
    /// Response text for the end user.
    pub response: String,
}
