// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic keyword classification.
//!
//! Disallowed patterns are checked first and win unconditionally. Tool
//! categories are then tested in [`Category::TOOL_PRIORITY`] order; every
//! match is recorded, and the first enabled one becomes the primary.

use std::collections::BTreeSet;

use supervisor_core::{
    ensure_query, Category, ClassificationResult, ClassificationSource, SupervisorError,
};

use crate::rules::RuleSet;

/// Classify a query against a rule snapshot.
///
/// Pure: no I/O, no logging, and the same `(query, rules)` always yields the
/// same result. Fails only for empty or whitespace-only queries.
pub fn classify(query: &str, rules: &RuleSet) -> Result<ClassificationResult, SupervisorError> {
    let query = ensure_query(query)?;

    if rules.disallowed_match(query).is_some() {
        return Ok(ClassificationResult::refuse());
    }

    let lowered = query.to_lowercase();
    let mut matched = BTreeSet::new();
    let mut primary = None;

    for route in rules.routes() {
        if route.first_match(&lowered).is_none() {
            continue;
        }
        matched.insert(route.category);
        if primary.is_none() && route.enabled {
            primary = Some(route.category);
        }
    }

    Ok(match primary {
        Some(category) => ClassificationResult {
            primary: category,
            matched,
            source: ClassificationSource::Keyword,
        },
        None => ClassificationResult {
            primary: Category::Direct,
            matched,
            source: ClassificationSource::Default,
        },
    })
}
