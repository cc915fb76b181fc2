// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator wiring and single-query mode.

use std::path::PathBuf;
use std::sync::Arc;

use supervisor_agent::{Collaborators, Supervisor};
use supervisor_anthropic::{resolve_api_key, AnthropicCompletion, AnthropicRoutingModel};
use supervisor_config::SupervisorConfig;
use supervisor_core::{CompletionProvider, RoutingModel, SupervisorError};
use supervisor_tools::{builtin_tools, OfflineCompletion};
use tracing::{info, warn};

/// Assembles the supervisor from configuration.
///
/// Without an Anthropic API key the direct handler answers with
/// [`OfflineCompletion`] and escalation is unavailable.
pub async fn build_supervisor(
    config: &SupervisorConfig,
    config_path: Option<PathBuf>,
) -> Result<Supervisor, SupervisorError> {
    let (completion, routing_model): (Arc<dyn CompletionProvider>, Option<Arc<dyn RoutingModel>>) =
        match resolve_api_key(config.anthropic.api_key.as_deref()) {
            Ok(_) => {
                let completion = AnthropicCompletion::new(&config.anthropic)?;
                let routing = AnthropicRoutingModel::new(&config.anthropic)?;
                (Arc::new(completion), Some(Arc::new(routing)))
            }
            Err(e) => {
                warn!(error = %e, "no Anthropic credentials, running offline");
                (Arc::new(OfflineCompletion), None)
            }
        };
    info!(provider = completion.name(), "direct responder selected");

    let supervisor = Supervisor::new(
        config,
        Collaborators {
            completion,
            tools: builtin_tools().await?,
            routing_model,
        },
    )?;

    Ok(match config_path {
        Some(path) => supervisor.with_config_path(path),
        None => supervisor,
    })
}

/// Answers one query on stdout.
pub async fn answer_once(
    supervisor: &Supervisor,
    query: &str,
    json: bool,
) -> Result<(), SupervisorError> {
    let outcome = supervisor.respond(query).await?;
    if json {
        let rendered = serde_json::to_string_pretty(&outcome)
            .map_err(|e| SupervisorError::Internal(format!("failed to encode outcome: {e}")))?;
        println!("{rendered}");
    } else {
        println!("{}", outcome.response);
    }
    Ok(())
}
