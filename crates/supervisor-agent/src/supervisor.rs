// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request orchestration: route, dispatch, and reload.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use supervisor_config::validation::validate_config;
use supervisor_config::{ConfigError, SupervisorConfig};
use supervisor_core::{
    log_excerpt, CompletionProvider, DispatchOutcome, RoutingModel, SupervisorError, ToolBackend,
};
use supervisor_router::{FallbackClassifier, QueryRouter, RuleSet, RuleSetHandle};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::dispatcher::Dispatcher;
use crate::handlers::{DirectHandler, ToolHandler};

/// External collaborators injected into a [`Supervisor`].
pub struct Collaborators {
    /// Backs the direct-answer handler.
    pub completion: Arc<dyn CompletionProvider>,
    /// Tool backends, matched to categories by [`ToolBackend::name`].
    pub tools: Vec<Arc<dyn ToolBackend>>,
    /// Decision model for escalation. `None` disables escalation regardless of configuration.
    pub routing_model: Option<Arc<dyn RoutingModel>>,
}

/// Owns the active rules and runs each request through router and dispatcher.
pub struct Supervisor {
    rules: RuleSetHandle,
    router: QueryRouter,
    dispatcher: Dispatcher,
    config_path: Option<PathBuf>,
}

impl Supervisor {
    /// Build from a validated configuration.
    pub fn new(
        config: &SupervisorConfig,
        collaborators: Collaborators,
    ) -> Result<Self, SupervisorError> {
        let rules = RuleSet::from_config(config)?;

        let mut dispatcher = Dispatcher::new(Duration::from_millis(config.timeouts.handler_ms));
        dispatcher.register(Arc::new(DirectHandler::new(collaborators.completion)));
        for backend in collaborators.tools {
            dispatcher.register(Arc::new(ToolHandler::new(backend)?));
        }

        let router = match collaborators.routing_model {
            Some(model) => QueryRouter::with_fallback(FallbackClassifier::new(
                model,
                Duration::from_millis(config.timeouts.escalation_ms),
            )),
            None => QueryRouter::new(),
        };

        if rules.escalation_enabled() && !router.has_fallback() {
            warn!("escalation enabled but no routing model available, using keyword rules only");
        }

        info!(
            enabled = ?rules.enabled_categories(),
            escalation = rules.escalation_enabled(),
            "supervisor initialized"
        );

        Ok(Self {
            rules: RuleSetHandle::new(rules),
            router,
            dispatcher,
            config_path: None,
        })
    }

    /// Remember the file `reload` should re-read. Without one, reload uses
    /// the standard hierarchy.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// The current rule snapshot.
    pub fn rules(&self) -> Arc<RuleSet> {
        self.rules.load()
    }

    /// Answer one query.
    pub async fn respond(&self, query: &str) -> Result<DispatchOutcome, SupervisorError> {
        self.respond_with_context(query, None).await
    }

    /// Answer one query, passing prior conversation to the escalation prompt.
    ///
    /// The whole request, including the direct handler's system prompt, uses
    /// a single rule snapshot even if a reload lands midway.
    pub async fn respond_with_context(
        &self,
        query: &str,
        context: Option<&str>,
    ) -> Result<DispatchOutcome, SupervisorError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("request", %request_id);

        async move {
            let rules = self.rules.load();
            let classification = self.router.route(query, &rules, context).await?;
            info!(
                primary = %classification.primary,
                source = %classification.source,
                matched = ?classification.matched,
                query = log_excerpt(query.trim()),
                "query classified"
            );

            let outcome = self.dispatcher.dispatch(&rules, &classification, query).await;
            match &outcome {
                Ok(outcome) => info!(handler = %outcome.handler_used, "request completed"),
                Err(e) => warn!(error = %e, "request failed"),
            }
            outcome
        }
        .instrument(span)
        .await
    }

    /// Re-read configuration and atomically publish the new snapshot.
    ///
    /// On failure the previous snapshot stays active.
    pub fn reload(&self) -> Result<(), SupervisorError> {
        let loaded = match &self.config_path {
            Some(path) => supervisor_config::load_and_validate_path(path),
            None => supervisor_config::load_and_validate(),
        };
        let config = loaded.map_err(|errors| config_error(&errors))?;
        self.apply_config(&config)
    }

    /// Validate `config` and publish it.
    pub fn apply_config(&self, config: &SupervisorConfig) -> Result<(), SupervisorError> {
        validate_config(config).map_err(|errors| config_error(&errors))?;
        let rules = RuleSet::from_config(config)?;

        info!(
            enabled = ?rules.enabled_categories(),
            escalation = rules.escalation_enabled(),
            "routing rules reloaded"
        );
        self.rules.store(rules);
        Ok(())
    }
}

fn config_error(errors: &[ConfigError]) -> SupervisorError {
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    SupervisorError::Config(messages.join("; "))
}
