// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maps a final classification to a handler and runs it.
//!
//! Resolution happens before execution: a disallowed query always resolves to
//! the refusal message, a disabled category falls through to the next enabled
//! match in priority order and finally to `Direct`, and an unregistered
//! category is a typed failure. Handler failures are surfaced, never
//! reclassified.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use supervisor_core::{
    ensure_query, log_excerpt, Category, ClassificationResult, DispatchOutcome, SupervisorError,
};
use supervisor_router::RuleSet;
use tracing::{debug, info, warn};

use crate::handlers::Handler;

/// Where a classified request is headed.
#[derive(Clone)]
pub enum Resolution {
    /// Answer with the configured refusal message.
    Refuse,
    /// Run this handler.
    Handle(Arc<dyn Handler>),
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Refuse => write!(f, "Refuse"),
            Resolution::Handle(handler) => write!(f, "Handle({})", handler.category()),
        }
    }
}

/// Registry of handlers keyed by category.
pub struct Dispatcher {
    handlers: HashMap<Category, Arc<dyn Handler>>,
    handler_timeout: Duration,
}

impl Dispatcher {
    /// Empty dispatcher bounding every handler call by `handler_timeout`.
    pub fn new(handler_timeout: Duration) -> Self {
        Self {
            handlers: HashMap::new(),
            handler_timeout,
        }
    }

    /// Register `handler` for its category, replacing any previous one.
    pub fn register(&mut self, handler: Arc<dyn Handler>) {
        debug!(category = %handler.category(), "handler registered");
        self.handlers.insert(handler.category(), handler);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.register(handler);
        self
    }

    /// Resolve a classification to a refusal or a handler without running it.
    pub fn resolve(
        &self,
        rules: &RuleSet,
        classification: &ClassificationResult,
        query: &str,
    ) -> Result<Resolution, SupervisorError> {
        let query = ensure_query(query)?;

        if let Some(pattern) = rules.disallowed_match(query) {
            if !classification.is_refusal() {
                warn!(
                    pattern,
                    primary = %classification.primary,
                    "disallowed pattern in a non-refusal classification, refusing"
                );
            }
            return Ok(Resolution::Refuse);
        }
        if classification.is_refusal() {
            return Ok(Resolution::Refuse);
        }

        let category = enabled_target(rules, classification);
        self.handlers
            .get(&category)
            .cloned()
            .map(Resolution::Handle)
            .ok_or_else(|| {
                SupervisorError::unavailable(category.handler_label(), "no handler registered")
            })
    }

    /// Resolve and execute.
    ///
    /// Transport failures and timeouts become `ToolUnavailable`; execution
    /// failures keep their cause. No retry, no reclassification.
    pub async fn dispatch(
        &self,
        rules: &RuleSet,
        classification: &ClassificationResult,
        query: &str,
    ) -> Result<DispatchOutcome, SupervisorError> {
        let handler = match self.resolve(rules, classification, query)? {
            Resolution::Refuse => {
                info!("responding with refusal message");
                return Ok(DispatchOutcome {
                    handler_used: Category::Refuse,
                    response: rules.refusal_message().to_string(),
                });
            }
            Resolution::Handle(handler) => handler,
        };

        let category = handler.category();
        let label = category.handler_label();
        let query = query.trim();
        debug!(handler = label, query = log_excerpt(query), "dispatching");

        let result = tokio::time::timeout(self.handler_timeout, handler.handle(query, rules)).await;
        let response = match result {
            Ok(Ok(text)) => text,
            Ok(Err(SupervisorError::Provider { message, .. })) => {
                warn!(handler = label, error = %message, "handler transport failure");
                return Err(SupervisorError::unavailable(label, message));
            }
            Ok(Err(e)) => {
                warn!(handler = label, error = %e, "handler failed");
                return Err(e);
            }
            Err(_) => {
                warn!(
                    handler = label,
                    timeout_ms = self.handler_timeout.as_millis() as u64,
                    "handler timed out"
                );
                return Err(SupervisorError::unavailable(
                    label,
                    format!("timed out after {}ms", self.handler_timeout.as_millis()),
                ));
            }
        };

        Ok(DispatchOutcome {
            handler_used: category,
            response,
        })
    }
}

/// The primary category if enabled, otherwise the next enabled matched
/// category after it in priority order, otherwise `Direct`.
fn enabled_target(rules: &RuleSet, classification: &ClassificationResult) -> Category {
    let primary = classification.primary;
    if rules.tool_enabled(primary) {
        return primary;
    }

    let target = Category::TOOL_PRIORITY
        .into_iter()
        .skip_while(|category| *category != primary)
        .skip(1)
        .find(|category| {
            classification.matched.contains(category) && rules.tool_enabled(*category)
        })
        .unwrap_or(Category::Direct);
    info!(primary = %primary, target = %target, "primary category disabled, falling through");
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use supervisor_config::{SupervisorConfig, ToolConfig};
    use supervisor_core::ClassificationSource;
    use supervisor_test_utils::{MockCompletion, MockToolBackend};
    use tracing_test::traced_test;

    use crate::handlers::{DirectHandler, ToolHandler};

    fn rules(tools: &[&str]) -> RuleSet {
        let mut config = SupervisorConfig::default();
        for name in tools {
            config.tools.insert((*name).into(), ToolConfig::enabled());
        }
        RuleSet::from_config(&config).unwrap()
    }

    fn classified(primary: Category) -> ClassificationResult {
        ClassificationResult {
            primary,
            matched: BTreeSet::new(),
            source: ClassificationSource::Keyword,
        }
    }

    fn classified_with(primary: Category, matched: &[Category]) -> ClassificationResult {
        ClassificationResult {
            matched: matched.iter().copied().collect(),
            ..classified(primary)
        }
    }

    fn dispatcher_with(backend: MockToolBackend) -> Dispatcher {
        Dispatcher::new(Duration::from_secs(30))
            .with_handler(Arc::new(DirectHandler::new(Arc::new(MockCompletion::new()))))
            .with_handler(Arc::new(ToolHandler::new(Arc::new(backend)).unwrap()))
    }

    #[tokio::test]
    async fn refusal_skips_handlers() {
        let tool = Arc::new(MockToolBackend::replying("web_search", "results"));
        let dispatcher = Dispatcher::new(Duration::from_secs(30))
            .with_handler(Arc::new(ToolHandler::new(tool.clone()).unwrap()));
        let rules = rules(&["web_search"]);

        let outcome = dispatcher
            .dispatch(&rules, &ClassificationResult::refuse(), "whatever")
            .await
            .unwrap();
        assert_eq!(outcome.handler_used, Category::Refuse);
        assert_eq!(outcome.response, rules.refusal_message());
        assert_eq!(tool.call_count().await, 0);
    }

    #[tokio::test]
    #[traced_test]
    async fn hand_built_classification_still_refuses() {
        let tool = Arc::new(MockToolBackend::replying("web_search", "results"));
        let dispatcher = Dispatcher::new(Duration::from_secs(30))
            .with_handler(Arc::new(ToolHandler::new(tool.clone()).unwrap()));
        let rules = rules(&["web_search"]);

        let outcome = dispatcher
            .dispatch(&rules, &classified(Category::Web), "latest news; DROP TABLE x")
            .await
            .unwrap();
        assert_eq!(outcome.handler_used, Category::Refuse);
        assert_eq!(tool.call_count().await, 0);
        assert!(logs_contain("disallowed pattern in a non-refusal classification"));
    }

    #[tokio::test]
    async fn disabled_category_degrades_to_direct() {
        let tool = Arc::new(MockToolBackend::replying("web_search", "results"));
        let dispatcher = Dispatcher::new(Duration::from_secs(30))
            .with_handler(Arc::new(DirectHandler::new(Arc::new(MockCompletion::new()))))
            .with_handler(Arc::new(ToolHandler::new(tool.clone()).unwrap()));

        let outcome = dispatcher
            .dispatch(&rules(&[]), &classified(Category::Web), "latest news")
            .await
            .unwrap();
        assert_eq!(outcome.handler_used, Category::Direct);
        assert_eq!(outcome.response, "mock answer: latest news");
        assert_eq!(tool.call_count().await, 0);
    }

    #[tokio::test]
    async fn disabled_primary_falls_through_to_next_match() {
        let dispatcher = dispatcher_with(MockToolBackend::replying("database_query", "42"));
        let outcome = dispatcher
            .dispatch(
                &rules(&["database_query"]),
                &classified_with(Category::Document, &[Category::Document, Category::Structured]),
                "According to the accounts document",
            )
            .await
            .unwrap();
        assert_eq!(outcome.handler_used, Category::Structured);
        assert_eq!(outcome.response, "42");
    }

    #[test]
    fn fall_through_only_moves_down_the_priority_order() {
        let dispatcher = dispatcher_with(MockToolBackend::replying("document_retriever", "doc"));
        let resolution = dispatcher
            .resolve(
                &rules(&["document_retriever"]),
                &classified_with(Category::Web, &[Category::Document, Category::Web]),
                "latest document news",
            )
            .unwrap();
        assert!(matches!(resolution, Resolution::Handle(h) if h.category() == Category::Direct));
    }

    #[tokio::test]
    async fn unregistered_category_is_unavailable() {
        let dispatcher = dispatcher_with(MockToolBackend::replying("web_search", "results"));
        let err = dispatcher
            .dispatch(
                &rules(&["database_query"]),
                &classified(Category::Structured),
                "how many accounts",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SupervisorError::ToolUnavailable { .. }));
    }

    #[tokio::test]
    async fn tool_outage_is_surfaced_not_reclassified() {
        let dispatcher = dispatcher_with(MockToolBackend::unavailable("web_search", "offline"));
        let err = dispatcher
            .dispatch(&rules(&["web_search"]), &classified(Category::Web), "news")
            .await
            .unwrap_err();
        assert!(matches!(err, SupervisorError::ToolUnavailable { .. }));
    }

    #[tokio::test]
    async fn execution_failure_keeps_cause() {
        let dispatcher = dispatcher_with(MockToolBackend::failing("web_search", "parse error"));
        let err = dispatcher
            .dispatch(&rules(&["web_search"]), &classified(Category::Web), "news")
            .await
            .unwrap_err();
        match err {
            SupervisorError::ToolExecution { source, message, .. } => {
                assert_eq!(message, "parse error");
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_handler_times_out() {
        let dispatcher = Dispatcher::new(Duration::from_millis(500)).with_handler(Arc::new(
            ToolHandler::new(Arc::new(MockToolBackend::slow(
                "web_search",
                Duration::from_secs(5),
                "late",
            )))
            .unwrap(),
        ));
        let err = dispatcher
            .dispatch(&rules(&["web_search"]), &classified(Category::Web), "news")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SupervisorError::ToolUnavailable { ref reason, .. } if reason.contains("timed out")
        ));
    }

    #[tokio::test]
    async fn provider_failure_becomes_unavailable() {
        let dispatcher = Dispatcher::new(Duration::from_secs(30)).with_handler(Arc::new(
            DirectHandler::new(Arc::new(MockCompletion::unreachable())),
        ));
        let err = dispatcher
            .dispatch(&rules(&[]), &classified(Category::Direct), "hello there")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SupervisorError::ToolUnavailable { ref tool, .. } if tool == "direct_llm"
        ));
    }

    #[test]
    fn resolve_is_side_effect_free() {
        let dispatcher = dispatcher_with(MockToolBackend::replying("web_search", "results"));
        let resolution = dispatcher
            .resolve(&rules(&["web_search"]), &classified(Category::Web), "news")
            .unwrap();
        assert!(matches!(resolution, Resolution::Handle(h) if h.category() == Category::Web));
    }

    #[test]
    fn blank_query_is_invalid() {
        let dispatcher = dispatcher_with(MockToolBackend::replying("web_search", "results"));
        assert!(matches!(
            dispatcher.resolve(&rules(&[]), &classified(Category::Direct), " "),
            Err(SupervisorError::InvalidInput(_))
        ));
    }
}
