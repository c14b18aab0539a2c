// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expression evaluation for expression triggers
//!
//! Normal expressions travel to the node as an `EvalRequest`. System
//! expressions run in-process on the controller and also see the `project`
//! binding.

use crate::env::{workspace_for, EnvironmentSnapshot};
use crate::error::{panic_message, ExpressionError};
use std::sync::Arc;
use strig_adapters::{EvalRequest, Node, NodeChannel};
use strig_core::expression::escape_backslashes;
use strig_core::macros::replace_macro;
use strig_core::{Bindings, Evaluation, ExpressionEvaluator, JobConfig, Parameters, ProjectBinding};
use strig_storage::{DataLayout, PollLog};

/// Everything an evaluation can see besides its source
pub struct ExpressionContext<'a> {
    /// Node chosen for the cycle
    pub node: &'a Node,
    pub controller: &'a Node,
    pub job: &'a JobConfig,
    pub env: &'a EnvironmentSnapshot,
    pub parameters: &'a Parameters,
    pub system_script: bool,
}

impl ExpressionContext<'_> {
    /// Node that files are read from and the expression runs on
    pub fn target(&self) -> &Node {
        if self.system_script {
            self.controller
        } else {
            self.node
        }
    }
}

#[derive(Clone)]
pub struct ExpressionExecutor<C> {
    channel: C,
    evaluator: Arc<dyn ExpressionEvaluator>,
    layout: DataLayout,
}

impl<C: NodeChannel> ExpressionExecutor<C> {
    pub fn new(channel: C, evaluator: Arc<dyn ExpressionEvaluator>, layout: DataLayout) -> Self {
        Self {
            channel,
            evaluator,
            layout,
        }
    }

    /// Evaluate inline source to a boolean
    pub async fn evaluate(
        &self,
        ctx: &ExpressionContext<'_>,
        source: &str,
        log: &PollLog,
    ) -> Result<bool, ExpressionError> {
        let resolved = escape_backslashes(&replace_macro(source, ctx.env.vars()));
        log.info(&format!("Evaluating the expression: \n {resolved}"));

        let bindings = Bindings {
            env: ctx.env.vars().clone(),
            parameters: ctx.parameters.clone(),
            project: ctx.system_script.then(|| self.project_binding(ctx)),
        };

        let evaluation = if ctx.system_script {
            self.evaluate_in_process(resolved, bindings).await?
        } else {
            self.channel
                .evaluate(
                    ctx.node,
                    EvalRequest {
                        source: resolved,
                        bindings,
                    },
                )
                .await?
        };

        for line in &evaluation.output {
            log.output(line);
        }
        Ok(evaluation.is_true())
    }

    /// Evaluate the contents of a file. A missing file evaluates to false.
    pub async fn evaluate_file(
        &self,
        ctx: &ExpressionContext<'_>,
        path: &str,
        log: &PollLog,
    ) -> Result<bool, ExpressionError> {
        let path = replace_macro(path, ctx.env.vars());
        let target = ctx.target();
        if !self.channel.file_exists(target, &path).await? {
            log.info(&format!("Can't load the file '{path}'. It doesn't exist."));
            return Ok(false);
        }
        let source = self.channel.read_file(target, &path).await?;
        self.evaluate(ctx, &source, log).await
    }

    async fn evaluate_in_process(
        &self,
        source: String,
        bindings: Bindings,
    ) -> Result<Evaluation, ExpressionError> {
        let evaluator = Arc::clone(&self.evaluator);
        let evaluated =
            tokio::task::spawn_blocking(move || evaluator.evaluate(&source, &bindings)).await;
        match evaluated {
            Ok(result) => Ok(result?),
            Err(e) if e.is_panic() => Err(ExpressionError::Panicked(panic_message(e.into_panic()))),
            Err(e) => Err(ExpressionError::Panicked(e.to_string())),
        }
    }

    fn project_binding(&self, ctx: &ExpressionContext<'_>) -> ProjectBinding {
        ProjectBinding {
            name: ctx.job.name.clone(),
            workspace: workspace_for(ctx.job, ctx.node).map(|p| p.display().to_string()),
            data_dir: self.layout.job_dir(&ctx.job.name).display().to_string(),
            parameters: ctx.job.parameters.iter().map(|p| p.name.clone()).collect(),
        }
    }
}

#[cfg(test)]
#[path = "expression_tests.rs"]
mod tests;
