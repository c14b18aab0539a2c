// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! strig-core: pure types and functions for the strig polling trigger
//!
//! This crate provides:
//! - Trigger and job configuration loaded from TOML
//! - Cron schedule matching and `@param` annotation parsing
//! - Macro resolution, `.properties` parsing and poll-log directives
//! - The expression evaluator used by expression triggers
//! - Label expressions for node selection

pub mod clock;
pub mod config;
pub mod directives;
pub mod expression;
pub mod label;
pub mod macros;
pub mod params;
pub mod poll;
pub mod properties;
pub mod schedule;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    load_file, ConfigError, ControllerConfig, EnvInjectConfig, ExpressionTrigger, JobConfig,
    NodeConfig, OsFamily, ParameterDefinition, QueueScope, ScriptTrigger, ServerConfig,
    Settings, TriggerConfig, TriggerKind,
};
pub use expression::{
    coerce_to_bool, Bindings, Evaluation, EvaluationError, ExpressionEvaluator,
    MiniJinjaEvaluator, ProjectBinding,
};
pub use label::{LabelError, LabelExpr};
pub use params::{find_parameters, MergePolicy, Parameters};
pub use poll::{BuildAction, PollResult};
pub use schedule::{CronSchedule, ScheduleError};
