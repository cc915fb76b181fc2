// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./supervisor.toml` > `~/.config/supervisor/supervisor.toml`
//! > `/etc/supervisor/supervisor.toml`, with environment variable overrides via
//! the `SUPERVISOR_` prefix. An explicit path bypasses the hierarchy and may be
//! TOML or JSON.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};

use crate::model::SupervisorConfig;

/// File name looked up in each hierarchy directory.
pub const CONFIG_FILE_NAME: &str = "supervisor.toml";

/// System-wide configuration path.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/supervisor/supervisor.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/supervisor/supervisor.toml`
/// 3. `~/.config/supervisor/supervisor.toml`
/// 4. `./supervisor.toml`
/// 5. `SUPERVISOR_*` environment variables
pub fn load_config() -> Result<SupervisorConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<SupervisorConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SupervisorConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a JSON string only (no files, no env).
pub fn load_config_from_json_str(json_content: &str) -> Result<SupervisorConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SupervisorConfig::default()))
        .merge(Json::string(json_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
///
/// Files ending in `.json` are parsed as JSON, everything else as TOML.
/// A missing file is an error here, unlike the hierarchy lookup.
pub fn load_config_from_path(path: &Path) -> Result<SupervisorConfig, figment::Error> {
    if !path.is_file() {
        return Err(figment::Error::from(format!(
            "configuration file not found: {}",
            path.display()
        )));
    }
    figment_for_path(path).extract()
}

/// Build the Figment for an explicit file (exposed for diagnostic use).
pub fn figment_for_path(path: &Path) -> Figment {
    let figment = Figment::new().merge(Serialized::defaults(SupervisorConfig::default()));
    let figment = if is_json(path) {
        figment.merge(Json::file(path))
    } else {
        figment.merge(Toml::file(path))
    };
    figment.merge(env_provider())
}

/// Build the Figment used for hierarchy loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(SupervisorConfig::default()));
    for path in hierarchy_paths() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Hierarchy files in merge order (lowest precedence first).
pub fn hierarchy_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("supervisor").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(CONFIG_FILE_NAME));
    paths
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `SUPERVISOR_ROUTING_RULES_ENABLE_LLM_FALLBACK` must map to
/// `routing_rules.enable_llm_fallback`, and `SUPERVISOR_SYSTEM_PROMPT` stays
/// top-level.
fn env_provider() -> Env {
    Env::prefixed("SUPERVISOR_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = if let Some(rest) = key_str.strip_prefix("routing_rules_") {
            format!("routing_rules.{rest}")
        } else if let Some(rest) = key_str.strip_prefix("timeouts_") {
            format!("timeouts.{rest}")
        } else if let Some(rest) = key_str.strip_prefix("anthropic_") {
            format!("anthropic.{rest}")
        } else {
            key_str
        };
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_extension_is_detected() {
        assert!(is_json(Path::new("config.json")));
        assert!(is_json(Path::new("/etc/app/CONFIG.JSON")));
        assert!(!is_json(Path::new("supervisor.toml")));
        assert!(!is_json(Path::new("config")));
    }

    #[test]
    fn hierarchy_ends_with_local_file() {
        let paths = hierarchy_paths();
        assert_eq!(paths.first(), Some(&PathBuf::from(SYSTEM_CONFIG_PATH)));
        assert_eq!(paths.last(), Some(&PathBuf::from(CONFIG_FILE_NAME)));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config_from_path(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("not found"), "got: {err}");
    }
}
