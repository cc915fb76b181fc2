// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable routing rule snapshots and the atomically swappable handle.
//!
//! A [`RuleSet`] is built once from configuration and never mutated. Reload
//! builds a new one and publishes it through [`RuleSetHandle::store`], so a
//! request that already loaded a snapshot keeps using it to completion.

use std::collections::BTreeSet;
use std::sync::Arc;

use arc_swap::ArcSwap;
use regex::Regex;
use supervisor_config::SupervisorConfig;
use supervisor_core::{Category, SupervisorError};
use tracing::warn;

use crate::ambiguity::AmbiguityDetector;

/// One tool category's keyword rule, in priority position.
#[derive(Debug, Clone)]
pub struct CategoryRoute {
    /// Category this rule routes to.
    pub category: Category,
    /// Lowercased keyword phrases, matched as substrings.
    pub keywords: Vec<String>,
    /// Whether the category's tool is enabled.
    pub enabled: bool,
    /// Operator-supplied tool description, if any.
    pub description: Option<String>,
}

impl CategoryRoute {
    /// First keyword contained in the lowercased query.
    pub fn first_match(&self, lowered_query: &str) -> Option<&str> {
        self.keywords
            .iter()
            .map(String::as_str)
            .find(|keyword| lowered_query.contains(keyword))
    }
}

/// A disallowed pattern compiled for whole-token matching.
#[derive(Debug, Clone)]
struct DisallowedPattern {
    pattern: String,
    regex: Regex,
}

impl DisallowedPattern {
    fn compile(pattern: &str) -> Result<Self, SupervisorError> {
        let source = format!(r"(?i)(?:^|[^\w]){}(?:$|[^\w])", regex::escape(pattern));
        let regex = Regex::new(&source).map_err(|e| {
            SupervisorError::InvalidInput(format!("disallowed pattern `{pattern}`: {e}"))
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }
}

/// Immutable snapshot of routing configuration and the direct-answer prompt.
#[derive(Debug, Clone)]
pub struct RuleSet {
    routes: Vec<CategoryRoute>,
    system_prompt: String,
    disallowed: Vec<DisallowedPattern>,
    escalation_enabled: bool,
    refusal_message: String,
    ambiguity: AmbiguityDetector,
}

impl RuleSet {
    /// Build a snapshot from validated configuration.
    ///
    /// Blank keyword or pattern entries are rejected with `InvalidInput`.
    /// Tool tables whose name is outside the fixed mapping are ignored.
    pub fn from_config(config: &SupervisorConfig) -> Result<Self, SupervisorError> {
        let rules = &config.routing_rules;

        for name in config.tools.keys() {
            if Category::from_tool_name(name).is_none() {
                warn!(tool = %name, "tool has no routing category, ignoring");
            }
        }

        let mut routes = Vec::with_capacity(Category::TOOL_PRIORITY.len());
        for category in Category::TOOL_PRIORITY {
            let (key, keywords) = match category {
                Category::Document => ("document_keywords", &rules.document_keywords),
                Category::Structured => ("database_keywords", &rules.database_keywords),
                _ => ("web_keywords", &rules.web_keywords),
            };
            let tool = category.tool_name().and_then(|name| config.tools.get(name));
            routes.push(CategoryRoute {
                category,
                keywords: normalize_keywords(key, keywords)?,
                enabled: tool.is_some_and(|t| t.enabled),
                description: tool.and_then(|t| t.description.clone()),
            });
        }

        let disallowed = rules
            .harmful_patterns
            .iter()
            .map(|pattern| {
                let trimmed = pattern.trim();
                if trimmed.is_empty() {
                    return Err(SupervisorError::InvalidInput(
                        "routing_rules.harmful_patterns contains an empty pattern".into(),
                    ));
                }
                DisallowedPattern::compile(trimmed)
            })
            .collect::<Result<Vec<_>, _>>()?;

        if rules.short_query_tokens > rules.weak_query_tokens {
            return Err(SupervisorError::InvalidInput(format!(
                "short_query_tokens ({}) exceeds weak_query_tokens ({})",
                rules.short_query_tokens, rules.weak_query_tokens
            )));
        }

        Ok(Self {
            routes,
            system_prompt: config.system_prompt.clone(),
            disallowed,
            escalation_enabled: rules.enable_llm_fallback,
            refusal_message: config.fallback_message.clone(),
            ambiguity: AmbiguityDetector::with_thresholds(
                rules.short_query_tokens,
                rules.weak_query_tokens,
            ),
        })
    }

    /// Tool category rules in priority order.
    pub fn routes(&self) -> &[CategoryRoute] {
        &self.routes
    }

    /// Whether `category` may be dispatched. `Direct` and `Refuse` always may.
    pub fn tool_enabled(&self, category: Category) -> bool {
        if !category.is_gated() {
            return true;
        }
        self.routes
            .iter()
            .any(|route| route.category == category && route.enabled)
    }

    /// Categories a request may currently resolve to, excluding `Refuse`.
    pub fn enabled_categories(&self) -> BTreeSet<Category> {
        let mut enabled: BTreeSet<Category> = self
            .routes
            .iter()
            .filter(|route| route.enabled)
            .map(|route| route.category)
            .collect();
        enabled.insert(Category::Direct);
        enabled
    }

    /// The first disallowed pattern present in `query` as a whole token.
    pub fn disallowed_match(&self, query: &str) -> Option<&str> {
        self.disallowed
            .iter()
            .find(|p| p.regex.is_match(query))
            .map(|p| p.pattern.as_str())
    }

    /// Disallowed patterns as configured (trimmed).
    pub fn disallowed_patterns(&self) -> impl Iterator<Item = &str> {
        self.disallowed.iter().map(|p| p.pattern.as_str())
    }

    pub fn escalation_enabled(&self) -> bool {
        self.escalation_enabled
    }

    /// System prompt for direct answers, published together with the rules.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Text returned to the user for refused queries.
    pub fn refusal_message(&self) -> &str {
        &self.refusal_message
    }

    pub fn ambiguity_detector(&self) -> &AmbiguityDetector {
        &self.ambiguity
    }
}

fn normalize_keywords(key: &str, keywords: &[String]) -> Result<Vec<String>, SupervisorError> {
    keywords
        .iter()
        .map(|keyword| {
            let trimmed = keyword.trim();
            if trimmed.is_empty() {
                Err(SupervisorError::InvalidInput(format!(
                    "routing_rules.{key} contains an empty keyword"
                )))
            } else {
                Ok(trimmed.to_lowercase())
            }
        })
        .collect()
}

/// Shared, atomically replaceable reference to the active [`RuleSet`].
#[derive(Debug)]
pub struct RuleSetHandle {
    current: ArcSwap<RuleSet>,
}

impl RuleSetHandle {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            current: ArcSwap::from_pointee(rules),
        }
    }

    /// The current snapshot. Later stores do not affect the returned value.
    pub fn load(&self) -> Arc<RuleSet> {
        self.current.load_full()
    }

    /// Publish a new snapshot in a single atomic swap.
    pub fn store(&self, rules: RuleSet) {
        self.current.store(Arc::new(rules));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supervisor_config::ToolConfig;

    fn config_with_tools(tools: &[(&str, bool)]) -> SupervisorConfig {
        let mut config = SupervisorConfig::default();
        for (name, enabled) in tools {
            let tool = if *enabled {
                ToolConfig::enabled()
            } else {
                ToolConfig::disabled()
            };
            config.tools.insert(name.to_string(), tool);
        }
        config
    }

    #[test]
    fn routes_follow_fixed_priority() {
        let rules = RuleSet::from_config(&SupervisorConfig::default()).unwrap();
        let order: Vec<Category> = rules.routes().iter().map(|r| r.category).collect();
        assert_eq!(order, Category::TOOL_PRIORITY.to_vec());
    }

    #[test]
    fn missing_tools_are_disabled_but_direct_is_not() {
        let rules = RuleSet::from_config(&SupervisorConfig::default()).unwrap();
        assert!(!rules.tool_enabled(Category::Document));
        assert!(rules.tool_enabled(Category::Direct));
        assert!(rules.tool_enabled(Category::Refuse));
        assert_eq!(
            rules.enabled_categories(),
            BTreeSet::from([Category::Direct])
        );
    }

    #[test]
    fn enabled_categories_track_tool_flags() {
        let config = config_with_tools(&[("document_retriever", true), ("web_search", false)]);
        let rules = RuleSet::from_config(&config).unwrap();
        assert_eq!(
            rules.enabled_categories(),
            BTreeSet::from([Category::Direct, Category::Document])
        );
    }

    #[test]
    fn keywords_are_lowercased() {
        let mut config = SupervisorConfig::default();
        config.routing_rules.document_keywords = vec!["Project Plan".into()];
        let rules = RuleSet::from_config(&config).unwrap();
        assert_eq!(rules.routes()[0].keywords, vec!["project plan"]);
    }

    #[test]
    fn blank_keyword_is_invalid_input() {
        let mut config = SupervisorConfig::default();
        config.routing_rules.database_keywords = vec!["  ".into()];
        let err = RuleSet::from_config(&config).unwrap_err();
        assert!(matches!(err, SupervisorError::InvalidInput(msg) if msg.contains("database_keywords")));
    }

    #[test]
    fn blank_pattern_is_invalid_input() {
        let mut config = SupervisorConfig::default();
        config.routing_rules.harmful_patterns = vec!["DROP".into(), "".into()];
        assert!(matches!(
            RuleSet::from_config(&config),
            Err(SupervisorError::InvalidInput(_))
        ));
    }

    #[test]
    fn disallowed_match_is_whole_token() {
        let rules = RuleSet::from_config(&SupervisorConfig::default()).unwrap();
        assert_eq!(rules.disallowed_match("DROP TABLE users"), Some("DROP"));
        assert_eq!(rules.disallowed_match("please drop it"), Some("DROP"));
        assert_eq!(rules.disallowed_match("(delete)"), Some("DELETE"));
        assert_eq!(rules.disallowed_match("the file was DELETED"), None);
        assert_eq!(rules.disallowed_match("raindrops keep falling"), None);
        assert_eq!(rules.disallowed_match("drop_table"), None);
    }

    #[test]
    fn multi_word_patterns_and_metacharacters() {
        let mut config = SupervisorConfig::default();
        config.routing_rules.harmful_patterns = vec!["rm -rf".into(), "a.b".into()];
        let rules = RuleSet::from_config(&config).unwrap();
        assert_eq!(rules.disallowed_match("please rm -rf /"), Some("rm -rf"));
        assert_eq!(rules.disallowed_match("axb"), None);
        assert_eq!(rules.disallowed_match("open a.b now"), Some("a.b"));
    }

    #[test]
    fn handle_swaps_without_touching_loaded_snapshots() {
        let handle = RuleSetHandle::new(RuleSet::from_config(&SupervisorConfig::default()).unwrap());
        let before = handle.load();

        let mut config = config_with_tools(&[("web_search", true)]);
        config.system_prompt = "Answer tersely.".into();
        handle.store(RuleSet::from_config(&config).unwrap());

        assert!(!before.tool_enabled(Category::Web));
        assert_ne!(before.system_prompt(), "Answer tersely.");
        let after = handle.load();
        assert!(after.tool_enabled(Category::Web));
        assert_eq!(after.system_prompt(), "Answer tersely.");
    }
}
