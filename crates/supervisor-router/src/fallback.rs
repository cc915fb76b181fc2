// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model-assisted secondary classification for ambiguous queries.
//!
//! The decision model's reply is untrusted: it must name exactly one
//! suggestable category whose tool is enabled. Every failure, including a
//! timeout, collapses to "no opinion" and is logged, never returned.

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use supervisor_core::{log_excerpt, Category, RoutingModel};
use tracing::{debug, info, warn};

/// Why an escalation produced no usable suggestion.
#[derive(Debug)]
enum EscalationFailure {
    /// The decision model reported an error.
    Transport(String),
    /// The decision model did not answer within the bound.
    TimedOut(Duration),
    /// The reply was not a suggestable category name.
    Malformed(String),
    /// The reply named a category that is not currently available.
    Rejected(Category),
}

impl std::fmt::Display for EscalationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EscalationFailure::Transport(msg) => write!(f, "transport error: {msg}"),
            EscalationFailure::TimedOut(after) => write!(f, "timed out after {after:?}"),
            EscalationFailure::Malformed(reply) => write!(f, "malformed reply `{reply}`"),
            EscalationFailure::Rejected(category) => {
                write!(f, "suggested category {category} is not available")
            }
        }
    }
}

/// Secondary classifier backed by a [`RoutingModel`].
pub struct FallbackClassifier {
    model: Arc<dyn RoutingModel>,
    timeout: Duration,
}

impl FallbackClassifier {
    /// Wrap `model`, bounding every call by `timeout`.
    pub fn new(model: Arc<dyn RoutingModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Ask the model for a category among `available`.
    ///
    /// Returns `None` ("no opinion") on any failure. Never retries.
    pub async fn suggest(
        &self,
        query: &str,
        available: &BTreeSet<Category>,
        context: Option<&str>,
    ) -> Option<Category> {
        let prompt = build_routing_prompt(query, available, context);
        match self.try_suggest(&prompt, available).await {
            Ok(category) => {
                info!(
                    model = self.model.name(),
                    suggestion = %category,
                    query = log_excerpt(query),
                    "routing model suggestion accepted"
                );
                Some(category)
            }
            Err(failure) => {
                warn!(
                    model = self.model.name(),
                    error = %failure,
                    query = log_excerpt(query),
                    "escalation failed, keeping keyword result"
                );
                None
            }
        }
    }

    async fn try_suggest(
        &self,
        prompt: &str,
        available: &BTreeSet<Category>,
    ) -> Result<Category, EscalationFailure> {
        let reply = tokio::time::timeout(self.timeout, self.model.decide(prompt))
            .await
            .map_err(|_| EscalationFailure::TimedOut(self.timeout))?
            .map_err(|e| EscalationFailure::Transport(e.to_string()))?;

        debug!(reply = %reply, "routing model replied");

        let category =
            parse_suggestion(&reply).ok_or_else(|| EscalationFailure::Malformed(reply.clone()))?;
        if !available.contains(&category) {
            return Err(EscalationFailure::Rejected(category));
        }
        Ok(category)
    }
}

/// Parse a raw model reply into a suggestable category.
///
/// Surrounding whitespace, quotes, backticks and a trailing period are
/// ignored; anything else must be exactly one category name in any case.
pub fn parse_suggestion(reply: &str) -> Option<Category> {
    let is_quote = |c: char| c == '"' || c == '\'' || c == '`';
    let cleaned = reply
        .trim()
        .trim_matches(is_quote)
        .trim_end_matches('.')
        .trim_matches(is_quote)
        .trim();
    let category = Category::from_str(cleaned).ok()?;
    Category::SUGGESTABLE.contains(&category).then_some(category)
}

fn category_description(category: Category) -> &'static str {
    match category {
        Category::Document => "search internal documents, files, and the knowledge base",
        Category::Structured => "query structured databases for metrics, counts, and analytics",
        Category::Web => "search the internet for current information and news",
        Category::Direct => "general knowledge questions that need no tool",
        Category::Refuse => "",
    }
}

/// Build the routing prompt listing only `available` categories.
///
/// Categories are listed in priority order with `Direct` last; `Refuse` is
/// never offered.
pub fn build_routing_prompt(
    query: &str,
    available: &BTreeSet<Category>,
    context: Option<&str>,
) -> String {
    let offered: Vec<Category> = Category::TOOL_PRIORITY
        .into_iter()
        .chain([Category::Direct])
        .filter(|c| available.contains(c))
        .collect();

    let mut prompt = String::from(
        "You are a query routing assistant. Decide which category should handle the user query.\n\nAvailable categories:\n",
    );
    for category in &offered {
        prompt.push_str(&format!("- {category}: {}\n", category_description(*category)));
    }

    if let Some(context) = context.map(str::trim).filter(|c| !c.is_empty()) {
        prompt.push_str(&format!("\nPrevious conversation context:\n{context}\n"));
    }

    let names: Vec<String> = offered.iter().map(ToString::to_string).collect();
    prompt.push_str(&format!(
        "\nUser query: \"{query}\"\n\nRespond with ONLY one category name from: {}.\n",
        names.join(", ")
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use supervisor_test_utils::MockRoutingModel;
    use tracing_test::traced_test;

    fn available(categories: &[Category]) -> BTreeSet<Category> {
        categories.iter().copied().collect()
    }

    #[test]
    fn parse_accepts_decorated_names() {
        assert_eq!(parse_suggestion("Structured"), Some(Category::Structured));
        assert_eq!(parse_suggestion("  web\n"), Some(Category::Web));
        assert_eq!(parse_suggestion("\"Document\""), Some(Category::Document));
        assert_eq!(parse_suggestion("`direct`."), Some(Category::Direct));
    }

    #[test]
    fn parse_rejects_everything_else() {
        assert_eq!(parse_suggestion(""), None);
        assert_eq!(parse_suggestion("Refuse"), None);
        assert_eq!(parse_suggestion("db"), None);
        assert_eq!(parse_suggestion("Web or Document"), None);
        assert_eq!(parse_suggestion("I think Web"), None);
    }

    #[test]
    fn prompt_lists_only_available_categories() {
        let prompt = build_routing_prompt(
            "project timeline",
            &available(&[Category::Direct, Category::Document]),
            None,
        );
        assert!(prompt.contains("- Document:"));
        assert!(prompt.contains("- Direct:"));
        assert!(!prompt.contains("Structured"));
        assert!(!prompt.contains("Web"));
        assert!(!prompt.contains("Refuse"));
        assert!(prompt.contains("User query: \"project timeline\""));
        assert!(prompt.contains("from: Document, Direct."));
    }

    #[test]
    fn prompt_includes_context_when_present() {
        let avail = available(&[Category::Direct]);
        let with = build_routing_prompt("and now?", &avail, Some("we discussed revenue"));
        assert!(with.contains("Previous conversation context:\nwe discussed revenue"));
        let blank = build_routing_prompt("and now?", &avail, Some("  "));
        assert!(!blank.contains("Previous conversation context"));
    }

    #[tokio::test]
    async fn valid_suggestion_is_returned() {
        let model = Arc::new(MockRoutingModel::with_replies(["Web"]));
        let fallback = FallbackClassifier::new(model.clone(), Duration::from_secs(5));
        let got = fallback
            .suggest("hi", &available(&[Category::Direct, Category::Web]), None)
            .await;
        assert_eq!(got, Some(Category::Web));
        assert_eq!(model.call_count().await, 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn unavailable_suggestion_is_no_opinion() {
        let model = Arc::new(MockRoutingModel::with_replies(["Structured"]));
        let fallback = FallbackClassifier::new(model, Duration::from_secs(5));
        let got = fallback
            .suggest("numbers", &available(&[Category::Direct]), None)
            .await;
        assert_eq!(got, None);
        assert!(logs_contain("suggested category Structured is not available"));
    }

    #[tokio::test]
    #[traced_test]
    async fn transport_error_is_no_opinion_without_retry() {
        let model = Arc::new(MockRoutingModel::failing());
        let fallback = FallbackClassifier::new(model.clone(), Duration::from_secs(5));
        let got = fallback.suggest("hi", &available(&[Category::Direct]), None).await;
        assert_eq!(got, None);
        assert_eq!(model.call_count().await, 1);
        assert!(logs_contain("escalation failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_model_times_out() {
        let model = Arc::new(MockRoutingModel::slow(Duration::from_secs(30), "Web"));
        let fallback = FallbackClassifier::new(model, Duration::from_secs(5));
        let got = fallback
            .suggest("hi", &available(&[Category::Direct, Category::Web]), None)
            .await;
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn malformed_reply_is_no_opinion() {
        let model = Arc::new(MockRoutingModel::with_replies(["use the database please"]));
        let fallback = FallbackClassifier::new(model, Duration::from_secs(5));
        let got = fallback
            .suggest("hi", &available(&[Category::Direct, Category::Structured]), None)
            .await;
        assert_eq!(got, None);
    }
}
