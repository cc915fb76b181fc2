// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query text helpers shared by the router and dispatcher.

use crate::error::SupervisorError;

/// Maximum number of characters of a query written to logs.
pub const LOG_EXCERPT_CHARS: usize = 50;

/// Rejects empty and whitespace-only queries, returning the trimmed text.
pub fn ensure_query(query: &str) -> Result<&str, SupervisorError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(SupervisorError::InvalidInput(
            "query cannot be empty or whitespace only".into(),
        ));
    }
    Ok(trimmed)
}

/// The first [`LOG_EXCERPT_CHARS`] characters of `query`, cut on a char boundary.
pub fn log_excerpt(query: &str) -> &str {
    match query.char_indices().nth(LOG_EXCERPT_CHARS) {
        Some((idx, _)) => &query[..idx],
        None => query,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_queries_are_logged_whole() {
        assert_eq!(log_excerpt("how many accounts"), "how many accounts");
    }

    #[test]
    fn long_queries_are_cut_on_char_boundary() {
        let query = "é".repeat(80);
        let excerpt = log_excerpt(&query);
        assert_eq!(excerpt.chars().count(), LOG_EXCERPT_CHARS);
    }
}
