// SPDX-FileCopyrightText: 2026 Supervisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handler dispatch and request orchestration for the Supervisor.
//!
//! The [`Supervisor`] is the central coordinator that:
//! - Loads one routing snapshot per request
//! - Classifies the query, escalating ambiguous ones when configured
//! - Dispatches to the resolved [`Handler`], honoring tool enablement
//! - Reloads configuration with a single atomic swap

pub mod dispatcher;
pub mod handlers;
pub mod supervisor;

pub use dispatcher::{Dispatcher, Resolution};
pub use handlers::{DirectHandler, Handler, ToolHandler};
pub use supervisor::{Collaborators, Supervisor};
