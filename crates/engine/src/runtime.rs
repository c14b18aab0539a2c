// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Production wiring of the poller and trigger service

use crate::poller::{PollDeps, Poller, PollerConfig};
use crate::trigger::TriggerService;
use std::sync::Arc;
use strig_adapters::{
    ConfiguredBuildRequester, InjectedEnvironment, LocalChannel, StaticNodeProvider,
    TracedBuildRequester, TracedChannel,
};
use strig_core::{Settings, SystemClock};

/// Poller with the real adapters, wrapped with tracing
pub type LocalPoller = Poller<
    StaticNodeProvider,
    TracedChannel<LocalChannel>,
    InjectedEnvironment,
    TracedBuildRequester<ConfiguredBuildRequester>,
    SystemClock,
>;

pub type LocalTriggerService = TriggerService<
    StaticNodeProvider,
    TracedChannel<LocalChannel>,
    InjectedEnvironment,
    TracedBuildRequester<ConfiguredBuildRequester>,
    SystemClock,
>;

/// Build a poller for `settings`. Paths in `settings` should already be
/// resolved.
pub fn local_poller(settings: &Settings) -> LocalPoller {
    let config = PollerConfig::from_settings(settings);
    let deps = PollDeps {
        nodes: StaticNodeProvider::from_settings(settings),
        channel: TracedChannel::new(LocalChannel::new(Arc::clone(&config.evaluator))),
        environment: InjectedEnvironment::new(),
        builds: TracedBuildRequester::new(ConfiguredBuildRequester::from_settings(
            &settings.server,
        )),
    };
    Poller::new(deps, config, SystemClock)
}

pub fn local_trigger_service(settings: &Settings) -> LocalTriggerService {
    TriggerService::new(settings, local_poller(settings))
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
