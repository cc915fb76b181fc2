// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Supervisor - routes questions to documents, metrics, web search, or a model.
//!
//! This is the binary entry point.

mod app;
mod shell;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use supervisor_config::SupervisorConfig;

/// Supervisor - answer a question with the right tool.
#[derive(Parser, Debug)]
#[command(name = "supervisor", version, about, long_about = None)]
struct Cli {
    /// Question to answer. Starts an interactive session when omitted.
    query: Option<String>,

    /// Configuration file (.toml or .json). Skips the standard search path.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start an interactive session even when a query is given.
    #[arg(short, long)]
    interactive: bool,

    /// Print the full outcome as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => supervisor_config::load_and_validate_path(path),
        None => supervisor_config::load_and_validate(),
    };
    let config: SupervisorConfig = match loaded {
        Ok(config) => config,
        Err(errors) => {
            supervisor_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level);

    let supervisor = match app::build_supervisor(&config, cli.config.clone()).await {
        Ok(supervisor) => supervisor,
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            std::process::exit(1);
        }
    };

    let result = match cli.query.as_deref() {
        Some(query) if !cli.interactive => app::answer_once(&supervisor, query, cli.json).await,
        Some(query) => {
            let first = app::answer_once(&supervisor, query, cli.json).await;
            match first {
                Ok(()) => shell::run_shell(&supervisor, cli.json).await,
                Err(e) => Err(e),
            }
        }
        None => shell::run_shell(&supervisor, cli.json).await,
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout carries only responses.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("supervisor={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_query_and_flags() {
        let cli = Cli::parse_from(["supervisor", "--config", "s.toml", "--json", "hello"]);
        assert_eq!(cli.query.as_deref(), Some("hello"));
        assert_eq!(cli.config, Some(PathBuf::from("s.toml")));
        assert!(cli.json);
        assert!(!cli.interactive);
    }

    #[test]
    fn cli_without_query_is_interactive() {
        let cli = Cli::parse_from(["supervisor", "-i"]);
        assert!(cli.query.is_none());
        assert!(cli.interactive);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
