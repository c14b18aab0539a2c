// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake node registry for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Node, NodeProvider};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct FakeNodeProvider {
    controller: Arc<Mutex<Node>>,
    agents: Arc<Mutex<Vec<Node>>>,
}

impl FakeNodeProvider {
    /// A registry holding only a controller rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            controller: Arc::new(Mutex::new(Node::new("built-in", Some(root.into())))),
            agents: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add_node(&self, node: Node) {
        self.agents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(node);
    }

    /// Take a node offline, or bring it back with the given root
    pub fn set_root(&self, name: &str, root: Option<PathBuf>) {
        let mut controller = self.controller.lock().unwrap_or_else(|e| e.into_inner());
        if controller.name == name {
            controller.root = root;
            return;
        }
        drop(controller);
        let mut agents = self.agents.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(node) = agents.iter_mut().find(|n| n.name == name) {
            node.root = root;
        }
    }
}

impl NodeProvider for FakeNodeProvider {
    fn controller(&self) -> Node {
        self.controller
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn all_nodes(&self) -> Vec<Node> {
        let mut nodes = vec![self.controller()];
        nodes.extend(
            self.agents
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .iter()
                .cloned(),
        );
        nodes
    }
}
