// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One poll cycle, from node selection to the build request
//!
//! Every cycle overwrites the job's poll log and narrates into it. Errors
//! never escape `run`: they are written to the log and reported as
//! `CycleOutcome::Failed`.

use crate::env::{EnvironmentResolver, EnvironmentSnapshot, ServerIdentity};
use crate::error::PollError;
use crate::expression::{ExpressionContext, ExpressionExecutor};
use crate::node::{select_node, NO_NODE_AVAILABLE};
use crate::script::ScriptExecutor;
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Instant;
use strig_adapters::{
    BuildRequest, BuildRequester, EnvironmentSource, Node, NodeChannel, NodeProvider,
};
use strig_core::directives::{extract_cause, extract_description};
use strig_core::macros::replace_macro;
use strig_core::properties::parse_properties;
use strig_core::{
    find_parameters, BuildAction, Clock, ExpressionEvaluator, ExpressionTrigger, JobConfig,
    MiniJinjaEvaluator, Parameters, PollResult, ScriptTrigger, Settings, TriggerKind,
};
use strig_storage::{DataLayout, PollLog};
use tracing::Instrument;

/// External collaborators of the poller
#[derive(Clone)]
pub struct PollDeps<P, C, E, B> {
    pub nodes: P,
    pub channel: C,
    pub environment: E,
    pub builds: B,
}

/// Server-wide poller settings
#[derive(Clone)]
pub struct PollerConfig {
    pub identity: ServerIdentity,
    pub layout: DataLayout,
    pub evaluator: Arc<dyn ExpressionEvaluator>,
}

impl PollerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            identity: ServerIdentity::from_settings(&settings.server),
            layout: DataLayout::new(&settings.server.data_dir),
            evaluator: Arc::new(MiniJinjaEvaluator::new()),
        }
    }
}

/// A cycle to run: the job as configured and the minute it fired for
#[derive(Debug, Clone)]
pub struct PollCycle {
    pub job: Arc<JobConfig>,
    pub at: DateTime<Local>,
}

impl PollCycle {
    pub fn new(job: Arc<JobConfig>, at: DateTime<Local>) -> Self {
        Self { job, at }
    }
}

/// How a cycle ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A build was requested
    Triggered(PollResult),
    NotTriggered,
    /// No online node matched the label
    NodeUnavailable,
    /// The job was already building
    Skipped,
    /// The cycle stopped on an error; the message is in the poll log
    Failed(String),
}

impl CycleOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            CycleOutcome::Triggered(_) => "triggered",
            CycleOutcome::NotTriggered => "not_triggered",
            CycleOutcome::NodeUnavailable => "node_unavailable",
            CycleOutcome::Skipped => "skipped",
            CycleOutcome::Failed(_) => "failed",
        }
    }

    /// The poll result seen by the build side
    pub fn result(&self) -> PollResult {
        match self {
            CycleOutcome::Triggered(result) => result.clone(),
            _ => PollResult::unchanged(),
        }
    }
}

pub struct Poller<P, C, E, B, K> {
    nodes: P,
    channel: C,
    builds: B,
    resolver: EnvironmentResolver<C, E>,
    scripts: ScriptExecutor<C>,
    expressions: ExpressionExecutor<C>,
    layout: DataLayout,
    clock: K,
}

impl<P, C, E, B, K> Poller<P, C, E, B, K>
where
    P: NodeProvider,
    C: NodeChannel,
    E: EnvironmentSource,
    B: BuildRequester,
    K: Clock,
{
    pub fn new(deps: PollDeps<P, C, E, B>, config: PollerConfig, clock: K) -> Self {
        Self {
            resolver: EnvironmentResolver::new(
                deps.channel.clone(),
                deps.environment,
                config.identity,
            ),
            scripts: ScriptExecutor::new(deps.channel.clone()),
            expressions: ExpressionExecutor::new(
                deps.channel.clone(),
                config.evaluator,
                config.layout.clone(),
            ),
            nodes: deps.nodes,
            channel: deps.channel,
            builds: deps.builds,
            layout: config.layout,
            clock,
        }
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// A cycle for `job` at the current time
    pub fn cycle_now(&self, job: Arc<JobConfig>) -> PollCycle {
        PollCycle::new(job, self.clock.now())
    }

    /// Run one cycle. Never fails; errors end up in the poll log.
    pub async fn run(&self, cycle: &PollCycle) -> CycleOutcome {
        let job = &cycle.job;
        let span = tracing::info_span!("poll", job = %job.name, kind = job.trigger.kind_name());
        async {
            let path = self
                .layout
                .poll_log(&job.name, job.trigger.log_file_name());
            let log = match PollLog::begin(&path, self.clock.now()) {
                Ok(log) => log,
                Err(e) => {
                    tracing::error!(error = %e, "cannot open poll log");
                    return CycleOutcome::Failed(e.to_string());
                }
            };

            let start = Instant::now();
            let outcome = match self.poll(cycle, &log).await {
                Ok(outcome) => outcome,
                Err(e) if e.is_unexpected() => {
                    log.error(&format!("SEVERE - Polling error: {e}"));
                    log.error(&format!("{e:?}"));
                    tracing::error!(error = %e, "polling failed unexpectedly");
                    CycleOutcome::Failed(e.to_string())
                }
                Err(e) => {
                    log.error(&format!("Polling error: {e}"));
                    tracing::warn!(error = %e, "polling error");
                    CycleOutcome::Failed(e.to_string())
                }
            };

            let elapsed = start.elapsed();
            log.finish(elapsed);
            tracing::info!(
                outcome = outcome.name(),
                elapsed_ms = elapsed.as_millis() as u64,
                "poll finished"
            );
            outcome
        }
        .instrument(span)
        .await
    }

    async fn poll(&self, cycle: &PollCycle, log: &PollLog) -> Result<CycleOutcome, PollError> {
        let job = &cycle.job;
        let trigger = &job.trigger;
        log.info(&format!("Polling for the job {}", job.name));

        if !trigger.concurrent_build && self.builds.is_building(&job.name).await? {
            log.info("The job is already building. Skipping polling.");
            return Ok(CycleOutcome::Skipped);
        }

        if let Some(problem) = trigger.validate().into_iter().next() {
            return Err(problem.into());
        }

        let label = trigger.label_expr()?;
        log.info("Looking nodes where the poll can be run.");
        let Some(node) = select_node(&self.nodes, label.as_ref()) else {
            log.info(NO_NODE_AVAILABLE);
            return Ok(CycleOutcome::NodeUnavailable);
        };
        log.info(&format!("Polling on {}", node.name));

        let env = self.resolver.resolve(&node, job).await?;

        let actions = match &trigger.kind {
            TriggerKind::Script(script) => self.poll_script(script, &node, &env, log).await?,
            TriggerKind::Expression(expression) => {
                self.poll_expression(expression, cycle, &node, &env, log)
                    .await?
            }
        };
        let Some(actions) = actions else {
            log.info("No changes.");
            return Ok(CycleOutcome::NotTriggered);
        };

        log.info("Changes found. Scheduling a build.");
        let cause = extract_cause(&log.contents()?)
            .or_else(|| trigger.cause.clone())
            .unwrap_or_else(|| trigger.default_cause().to_string());

        self.builds
            .schedule_build(BuildRequest {
                job: job.name.clone(),
                quiet_period: 0,
                cause: cause.clone(),
                actions: actions.clone(),
                concurrent: trigger.concurrent_build,
            })
            .await?;

        Ok(CycleOutcome::Triggered(PollResult::changed(cause, actions)))
    }

    /// Inline script first, then the script file; `None` when neither
    /// returned the expected code
    async fn poll_script(
        &self,
        script: &ScriptTrigger,
        node: &Node,
        env: &EnvironmentSnapshot,
        log: &PollLog,
    ) -> Result<Option<Vec<BuildAction>>, PollError> {
        let expected = script.expected_exit_code()?;
        log.info(&format!("The expected script execution code is {expected}"));

        let mut matched = false;
        if let Some(text) = &script.script {
            let code = self.scripts.run_inline(node, text, env, log).await?;
            matched = exit_code_matches(code, expected, log);
        }
        if !matched {
            if let Some(path) = &script.script_file_path {
                let code = self.scripts.run_file(node, path, env, log).await?;
                matched = exit_code_matches(code, expected, log);
            }
        }
        if !matched {
            return Ok(None);
        }

        let description = extract_description(&log.contents()?);
        Ok(Some(
            description.map(BuildAction::Description).into_iter().collect(),
        ))
    }

    /// Inline expression first, then the expression file; on a match the
    /// build carries properties-file and `@param` parameters
    async fn poll_expression(
        &self,
        expression: &ExpressionTrigger,
        cycle: &PollCycle,
        node: &Node,
        env: &EnvironmentSnapshot,
        log: &PollLog,
    ) -> Result<Option<Vec<BuildAction>>, PollError> {
        let job = &cycle.job;
        let cron_parameters = find_parameters(&job.trigger.spec, &cycle.at)?;
        log.info(&format!(
            "[debug] Parameters: {}",
            format_parameters(&cron_parameters)
        ));

        let controller = self.nodes.controller();
        let ctx = ExpressionContext {
            node,
            controller: &controller,
            job,
            env,
            parameters: &cron_parameters,
            system_script: expression.system_script,
        };

        let mut matched = false;
        if let Some(source) = &expression.expression {
            matched = self.expressions.evaluate(&ctx, source, log).await?;
        }
        if !matched {
            if let Some(path) = &expression.expression_file_path {
                matched = self.expressions.evaluate_file(&ctx, path, log).await?;
            }
        }
        if !matched {
            return Ok(None);
        }

        let file_parameters = self.read_properties(expression, &ctx, log).await?;
        let merged = expression
            .merge_policy
            .merge(file_parameters, cron_parameters);
        let parameters = job.apply_definitions(merged);
        if parameters.is_empty() {
            return Ok(Some(Vec::new()));
        }
        Ok(Some(vec![BuildAction::Parameters(parameters)]))
    }

    async fn read_properties(
        &self,
        expression: &ExpressionTrigger,
        ctx: &ExpressionContext<'_>,
        log: &PollLog,
    ) -> Result<Parameters, PollError> {
        let Some(path) = &expression.properties_file_path else {
            return Ok(Parameters::new());
        };
        let path = replace_macro(path, ctx.env.vars());
        if ctx.system_script {
            log.info("System script.");
        } else {
            log.info("Script executed on node.");
        }

        let target = ctx.target();
        if !self.channel.file_exists(target, &path).await? {
            log.info(&format!(
                "Can't load the properties file '{path}'. It doesn't exist."
            ));
            return Ok(Parameters::new());
        }
        let content = self.channel.read_file(target, &path).await?;
        Ok(parse_properties(&content))
    }
}

fn exit_code_matches(code: i32, expected: i32, log: &PollLog) -> bool {
    log.info(&format!("The exit code is '{code}'."));
    log.info(&format!(
        "Testing if the script execution code returns '{expected}'."
    ));
    code == expected
}

/// `{a=1, b=2}`
fn format_parameters(parameters: &Parameters) -> String {
    let pairs: Vec<String> = parameters
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    format!("{{{}}}", pairs.join(", "))
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
