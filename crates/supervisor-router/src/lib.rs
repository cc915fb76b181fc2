// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query classification and routing for the Supervisor.
//!
//! This crate provides:
//! - [`RuleSet`] / [`RuleSetHandle`]: immutable routing snapshots with atomic reload
//! - [`classify`]: deterministic keyword classification with refusal short-circuit
//! - [`AmbiguityDetector`]: decides when keyword routing needs a second opinion
//! - [`FallbackClassifier`]: validated, time-bounded model-assisted suggestion
//! - [`QueryRouter`]: ties the above together for a single request

pub mod ambiguity;
pub mod classifier;
pub mod fallback;
pub mod router;
pub mod rules;

pub use ambiguity::{AmbiguityDetector, AmbiguityReason};
pub use classifier::classify;
pub use fallback::{build_routing_prompt, parse_suggestion, FallbackClassifier};
pub use router::QueryRouter;
pub use rules::{CategoryRoute, RuleSet, RuleSetHandle};
