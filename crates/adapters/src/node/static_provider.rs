// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node registry built from settings

use super::{Node, NodeProvider};
use std::sync::Arc;
use strig_core::Settings;

#[derive(Clone, Debug)]
pub struct StaticNodeProvider {
    controller: Arc<Node>,
    agents: Arc<Vec<Node>>,
}

impl StaticNodeProvider {
    pub fn new(controller: Node, agents: Vec<Node>) -> Self {
        Self {
            controller: Arc::new(controller),
            agents: Arc::new(agents),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let c = &settings.controller;
        let controller = Node::new(c.name.clone(), c.root.clone())
            .with_labels(c.labels.clone())
            .with_os(c.os);
        let agents = settings
            .nodes
            .iter()
            .map(|n| {
                let root = n.root.clone().filter(|_| n.online);
                Node::new(n.name.clone(), root)
                    .with_labels(n.labels.clone())
                    .with_os(n.os)
            })
            .collect();
        Self::new(controller, agents)
    }
}

impl NodeProvider for StaticNodeProvider {
    fn controller(&self) -> Node {
        (*self.controller).clone()
    }

    fn all_nodes(&self) -> Vec<Node> {
        std::iter::once(self.controller())
            .chain(self.agents.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
#[path = "static_provider_tests.rs"]
mod tests;
