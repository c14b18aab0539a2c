// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger registry: matches job schedules against ticks and submits cycles

use crate::poller::{PollCycle, Poller};
use crate::single_flight::{SchedulerError, SingleFlightScheduler};
use chrono::{DateTime, Local};
use std::sync::Arc;
use strig_adapters::{BuildRequester, EnvironmentSource, NodeChannel, NodeProvider};
use strig_core::{Clock, CronSchedule, JobConfig, QueueScope, Settings};

struct ScheduledJob {
    job: Arc<JobConfig>,
    schedule: CronSchedule,
}

/// What one tick did
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Jobs whose cycle was queued
    pub submitted: Vec<String>,
    pub rejected: Vec<(String, SchedulerError)>,
}

pub struct TriggerService<P, C, E, B, K> {
    poller: Arc<Poller<P, C, E, B, K>>,
    scheduler: SingleFlightScheduler,
    scope: QueueScope,
    jobs: Vec<ScheduledJob>,
}

impl<P, C, E, B, K> TriggerService<P, C, E, B, K>
where
    P: NodeProvider,
    C: NodeChannel,
    E: EnvironmentSource,
    B: BuildRequester,
    K: Clock,
{
    /// Register every job with a valid schedule
    pub fn new(settings: &Settings, poller: Poller<P, C, E, B, K>) -> Self {
        let mut jobs = Vec::new();
        for job in settings.jobs.values() {
            match job.trigger.schedule() {
                Ok(schedule) => jobs.push(ScheduledJob {
                    job: Arc::new(job.clone()),
                    schedule,
                }),
                Err(e) => {
                    tracing::error!(job = %job.name, error = %e, "job not registered");
                }
            }
        }
        tracing::info!(jobs = jobs.len(), "triggers registered");

        Self {
            poller: Arc::new(poller),
            scheduler: SingleFlightScheduler::new(settings.server.queue_capacity),
            scope: settings.server.queue_scope,
            jobs,
        }
    }

    /// Names of registered jobs
    pub fn jobs(&self) -> impl Iterator<Item = &str> {
        self.jobs.iter().map(|j| j.job.name.as_str())
    }

    pub fn scheduler(&self) -> &SingleFlightScheduler {
        &self.scheduler
    }

    /// Queue a job's cycles share
    pub fn queue_key(&self, job: &JobConfig) -> String {
        match self.scope {
            QueueScope::Type => job.trigger.kind_name().to_string(),
            QueueScope::Job => format!("job:{}", job.name),
        }
    }

    /// Submit a cycle for every job whose schedule includes `at`
    pub fn tick(&self, at: DateTime<Local>) -> TickReport {
        let mut report = TickReport::default();
        for scheduled in self.jobs.iter().filter(|j| j.schedule.matches(&at)) {
            let name = scheduled.job.name.clone();
            let key = self.queue_key(&scheduled.job);
            let poller = Arc::clone(&self.poller);
            let cycle = PollCycle::new(Arc::clone(&scheduled.job), at);

            let submitted = self.scheduler.submit(
                &key,
                Box::pin(async move {
                    poller.run(&cycle).await;
                }),
            );
            match submitted {
                Ok(()) => {
                    tracing::debug!(job = %name, queue = %key, "cycle queued");
                    report.submitted.push(name);
                }
                Err(e) => {
                    tracing::error!(job = %name, queue = %key, error = %e, "cycle rejected");
                    report.rejected.push((name, e));
                }
            }
        }
        report
    }

    /// Wait for queued cycles, then stop all workers
    pub async fn shutdown(&self) {
        self.scheduler.shutdown().await;
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
