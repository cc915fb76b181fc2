// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive REPL with colored prompt and readline history.
//!
//! The last few exchanges are passed to the router as conversation context,
//! so an escalated classification can see what the user asked before.

use std::collections::VecDeque;

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use supervisor_agent::Supervisor;
use supervisor_core::{log_excerpt, Category, SupervisorError};
use supervisor_router::RuleSet;
use tracing::debug;

/// Exchanges kept as routing context.
const CONTEXT_EXCHANGES: usize = 3;

/// What a line of input asks the shell to do.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Quit,
    Reload,
    Rules,
    Skip,
    Query(&'a str),
}

fn parse_line(line: &str) -> ShellCommand<'_> {
    match line.trim() {
        "" => ShellCommand::Skip,
        "exit" | "quit" | "q" | "/quit" | "/exit" => ShellCommand::Quit,
        "/reload" => ShellCommand::Reload,
        "/rules" => ShellCommand::Rules,
        query => ShellCommand::Query(query),
    }
}

/// Runs the interactive session until the user quits.
pub async fn run_shell(supervisor: &Supervisor, json: bool) -> Result<(), SupervisorError> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| SupervisorError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "supervisor".bold().green());
    println!(
        "Type {} to exit, {} to reload configuration, {} to show routing.\n",
        "/quit".yellow(),
        "/reload".yellow(),
        "/rules".yellow()
    );

    let mut history: VecDeque<String> = VecDeque::with_capacity(CONTEXT_EXCHANGES);
    let prompt = format!("{}> ", "supervisor".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let query = match parse_line(&line) {
                    ShellCommand::Quit => break,
                    ShellCommand::Skip => continue,
                    ShellCommand::Reload => {
                        match supervisor.reload() {
                            Ok(()) => println!("{}", "configuration reloaded".dimmed()),
                            Err(e) => eprintln!("{}: {e}", "error".red()),
                        }
                        continue;
                    }
                    ShellCommand::Rules => {
                        print!("{}", describe_rules(&supervisor.rules()));
                        continue;
                    }
                    ShellCommand::Query(query) => query,
                };

                let _ = rl.add_history_entry(query);

                let context = render_context(&history);
                let context = (!context.is_empty()).then_some(context.as_str());
                match supervisor.respond_with_context(query, context).await {
                    Ok(outcome) => {
                        if json {
                            match serde_json::to_string_pretty(&outcome) {
                                Ok(rendered) => println!("{rendered}"),
                                Err(e) => eprintln!("{}: {e}", "error".red()),
                            }
                        } else {
                            println!("{} {}", label(outcome.handler_used), outcome.response);
                        }
                        remember(
                            &mut history,
                            format!("User: {query}\nAssistant: {}", outcome.response),
                        );
                    }
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

fn remember(history: &mut VecDeque<String>, exchange: String) {
    if history.len() == CONTEXT_EXCHANGES {
        history.pop_front();
    }
    debug!(exchange = log_excerpt(&exchange), "context updated");
    history.push_back(exchange);
}

fn render_context(history: &VecDeque<String>) -> String {
    history.iter().map(String::as_str).collect::<Vec<_>>().join("\n")
}

fn label(category: Category) -> colored::ColoredString {
    let tag = format!("[{}]", category.handler_label());
    match category {
        Category::Refuse => tag.red(),
        Category::Direct => tag.cyan(),
        _ => tag.blue(),
    }
}

/// Plain-text summary of a routing snapshot, in priority order.
fn describe_rules(rules: &RuleSet) -> String {
    let mut out = String::new();
    for route in rules.routes() {
        let state = if route.enabled { "enabled" } else { "disabled" };
        out.push_str(&format!(
            "{:<11} {:<8} {}\n",
            route.category.to_string(),
            state,
            route.keywords.join(", ")
        ));
        if let Some(description) = &route.description {
            out.push_str(&format!("            {description}\n"));
        }
    }
    let patterns: Vec<&str> = rules.disallowed_patterns().collect();
    out.push_str(&format!("disallowed: {}\n", patterns.join(", ")));
    out.push_str(&format!(
        "escalation: {}\n",
        if rules.escalation_enabled() { "on" } else { "off" }
    ));
    out
}
