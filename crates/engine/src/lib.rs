// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! strig polling engine
//!
//! A `TriggerService` matches job schedules against minute ticks and hands
//! each due cycle to a `SingleFlightScheduler`. The `Poller` runs the cycle:
//! it picks a node, resolves the environment, runs the script or expression
//! and requests at most one build.

mod env;
mod error;
mod expression;
mod node;
mod poller;
mod runtime;
mod script;
mod single_flight;
mod trigger;

#[cfg(test)]
mod test_helpers;

pub use env::{EnvironmentResolver, EnvironmentSnapshot, ServerIdentity};
pub use error::{ExpressionError, PollError, ResolveError, ScriptError};
pub use expression::{ExpressionContext, ExpressionExecutor};
pub use node::{select_node, NO_NODE_AVAILABLE};
pub use poller::{CycleOutcome, PollCycle, PollDeps, Poller, PollerConfig};
pub use runtime::{local_poller, local_trigger_service, LocalPoller, LocalTriggerService};
pub use script::ScriptExecutor;
pub use single_flight::{CycleFuture, QueueState, SchedulerError, SingleFlightScheduler};
pub use trigger::{TickReport, TriggerService};
