// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Collaborators of the polling engine: nodes, the channel that runs work
//! on them, env-injection variables and the build requester

pub mod build;
pub mod channel;
pub mod environment;
pub mod node;
pub mod traced;

pub use build::{
    BuildError, BuildRequest, BuildRequester, ConfiguredBuildRequester, HttpBuildRequester,
    LogBuildRequester,
};
pub use channel::{
    ChannelError, EvalRequest, LaunchOutcome, LaunchRequest, LocalChannel, NodeChannel, OutputSink,
};
pub use environment::{
    EnvironmentError, EnvironmentSource, InjectedEnvironment, NoOpEnvironment,
};
pub use node::{Node, NodeProvider, StaticNodeProvider};
pub use traced::{TracedBuildRequester, TracedChannel};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use build::{BuildCall, FakeBuildRequester};
#[cfg(any(test, feature = "test-support"))]
pub use channel::{ChannelCall, FakeChannel};
#[cfg(any(test, feature = "test-support"))]
pub use environment::FakeEnvironment;
#[cfg(any(test, feature = "test-support"))]
pub use node::FakeNodeProvider;
