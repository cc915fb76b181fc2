// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic that decides when keyword routing is too uncertain to trust.

use std::collections::BTreeSet;

use supervisor_core::Category;

/// Why a query was judged ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbiguityReason {
    /// Keywords from two or more categories matched.
    ConflictingMatches,
    /// No keyword matched and the query is very short.
    TooShort,
    /// No keyword matched and the query is only slightly longer.
    WeakSignal,
}

impl std::fmt::Display for AmbiguityReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AmbiguityReason::ConflictingMatches => write!(f, "conflicting matches"),
            AmbiguityReason::TooShort => write!(f, "too short"),
            AmbiguityReason::WeakSignal => write!(f, "weak signal"),
        }
    }
}

/// Token-count thresholds for the ambiguity rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmbiguityDetector {
    /// Unmatched queries with fewer tokens than this are too short.
    short_query_tokens: usize,
    /// Unmatched queries with fewer tokens than this are weak.
    weak_query_tokens: usize,
}

impl AmbiguityDetector {
    /// Detector with the default thresholds (3 and 5 tokens).
    pub fn new() -> Self {
        Self {
            short_query_tokens: 3,
            weak_query_tokens: 5,
        }
    }

    /// Detector with custom thresholds. `short` should not exceed `weak`.
    pub fn with_thresholds(short_query_tokens: usize, weak_query_tokens: usize) -> Self {
        Self {
            short_query_tokens,
            weak_query_tokens,
        }
    }

    /// Whether the query needs escalation.
    pub fn is_ambiguous(&self, query: &str, matched: &BTreeSet<Category>) -> bool {
        self.assess(query, matched).is_some()
    }

    /// The first ambiguity rule that fires, if any.
    pub fn assess(&self, query: &str, matched: &BTreeSet<Category>) -> Option<AmbiguityReason> {
        if matched.len() > 1 {
            return Some(AmbiguityReason::ConflictingMatches);
        }
        if !matched.is_empty() {
            return None;
        }

        let tokens = query.split_whitespace().count();
        if tokens < self.short_query_tokens {
            Some(AmbiguityReason::TooShort)
        } else if tokens < self.weak_query_tokens {
            Some(AmbiguityReason::WeakSignal)
        } else {
            None
        }
    }
}

impl Default for AmbiguityDetector {
    fn default() -> Self {
        Self::new()
    }
}
