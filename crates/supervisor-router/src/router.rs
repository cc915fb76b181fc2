// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query routing with optional model-assisted escalation.
//!
//! Orchestrates classification: disallowed pattern > keyword priority >
//! escalation (only when enabled, configured, and ambiguous).

use supervisor_core::{log_excerpt, ClassificationResult, ClassificationSource, SupervisorError};
use tracing::{debug, info};

use crate::classifier::classify;
use crate::fallback::FallbackClassifier;
use crate::rules::RuleSet;

/// Produces the final classification for a request.
pub struct QueryRouter {
    fallback: Option<FallbackClassifier>,
}

impl QueryRouter {
    /// Router that only uses keyword rules.
    pub fn new() -> Self {
        Self { fallback: None }
    }

    /// Router that escalates ambiguous queries to `fallback`.
    pub fn with_fallback(fallback: FallbackClassifier) -> Self {
        Self {
            fallback: Some(fallback),
        }
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Classify `query` against `rules`, escalating when warranted.
    ///
    /// Priority order:
    /// 1. Disallowed pattern (refusal, never escalated)
    /// 2. Keyword classification
    /// 3. Escalation, if `rules` enable it, a fallback is configured, and the
    ///    query is ambiguous. An accepted suggestion replaces `primary`;
    ///    "no opinion" keeps the keyword result.
    pub async fn route(
        &self,
        query: &str,
        rules: &RuleSet,
        context: Option<&str>,
    ) -> Result<ClassificationResult, SupervisorError> {
        let keyword = classify(query, rules)?;
        let query = query.trim();

        if keyword.is_refusal() {
            info!(
                pattern = rules.disallowed_match(query).unwrap_or_default(),
                query = log_excerpt(query),
                "disallowed pattern matched, refusing"
            );
            return Ok(keyword);
        }

        debug!(
            primary = %keyword.primary,
            matched = ?keyword.matched,
            source = %keyword.source,
            "keyword classification"
        );

        if !rules.escalation_enabled() {
            return Ok(keyword);
        }
        let Some(fallback) = &self.fallback else {
            debug!("escalation enabled but no routing model configured");
            return Ok(keyword);
        };
        let Some(reason) = rules.ambiguity_detector().assess(query, &keyword.matched) else {
            return Ok(keyword);
        };

        info!(
            reason = %reason,
            query = log_excerpt(query),
            "ambiguous query, escalating"
        );

        match fallback
            .suggest(query, &rules.enabled_categories(), context)
            .await
        {
            Some(category) => Ok(ClassificationResult {
                primary: category,
                matched: keyword.matched,
                source: ClassificationSource::Escalated,
            }),
            None => Ok(keyword),
        }
    }
}

impl Default for QueryRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use supervisor_config::{SupervisorConfig, ToolConfig};
    use supervisor_core::Category;
    use supervisor_test_utils::MockRoutingModel;

    fn escalating_rules() -> RuleSet {
        let mut config = SupervisorConfig::default();
        config.routing_rules.enable_llm_fallback = true;
        config
            .tools
            .insert("web_search".into(), ToolConfig::enabled());
        RuleSet::from_config(&config).unwrap()
    }

    fn router(model: Arc<MockRoutingModel>) -> QueryRouter {
        QueryRouter::with_fallback(FallbackClassifier::new(model, Duration::from_secs(5)))
    }

    #[tokio::test]
    async fn refusal_never_escalates() {
        let model = Arc::new(MockRoutingModel::with_replies(["Web"]));
        let result = router(model.clone())
            .route("DROP", &escalating_rules(), None)
            .await
            .unwrap();
        assert_eq!(result.primary, Category::Refuse);
        assert_eq!(model.call_count().await, 0);
    }

    #[tokio::test]
    async fn clear_match_does_not_escalate() {
        let model = Arc::new(MockRoutingModel::with_replies(["Direct"]));
        let result = router(model.clone())
            .route("what is the latest on the launch", &escalating_rules(), None)
            .await
            .unwrap();
        assert_eq!(result.primary, Category::Web);
        assert_eq!(result.source, ClassificationSource::Keyword);
        assert_eq!(model.call_count().await, 0);
    }

    #[tokio::test]
    async fn short_query_takes_suggestion() {
        let model = Arc::new(MockRoutingModel::with_replies(["Web"]));
        let result = router(model.clone())
            .route("weather today", &escalating_rules(), None)
            .await
            .unwrap();
        assert_eq!(result.primary, Category::Web);
        assert_eq!(result.source, ClassificationSource::Escalated);
        assert!(result.matched.is_empty());
    }

    #[tokio::test]
    async fn escalation_disabled_keeps_keyword_result() {
        let model = Arc::new(MockRoutingModel::with_replies(["Web"]));
        let rules = RuleSet::from_config(&SupervisorConfig::default()).unwrap();
        let result = router(model.clone()).route("hi", &rules, None).await.unwrap();
        assert_eq!(result.primary, Category::Direct);
        assert_eq!(result.source, ClassificationSource::Default);
        assert_eq!(model.call_count().await, 0);
    }

    #[tokio::test]
    async fn no_fallback_configured_keeps_keyword_result() {
        let result = QueryRouter::new()
            .route("hi", &escalating_rules(), None)
            .await
            .unwrap();
        assert_eq!(result.primary, Category::Direct);
    }

    #[tokio::test]
    async fn context_reaches_the_prompt() {
        let model = Arc::new(MockRoutingModel::with_replies(["Direct"]));
        router(model.clone())
            .route("and then?", &escalating_rules(), Some("earlier: revenue"))
            .await
            .unwrap();
        let prompts = model.prompts().await;
        assert!(prompts[0].contains("earlier: revenue"));
    }

    #[tokio::test]
    async fn blank_query_is_rejected_before_escalation() {
        let model = Arc::new(MockRoutingModel::with_replies(["Web"]));
        let err = router(model.clone())
            .route("   ", &escalating_rules(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, SupervisorError::InvalidInput(_)));
        assert_eq!(model.call_count().await, 0);
    }
}
