// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution nodes and the registry that lists them

mod static_provider;

pub use static_provider::StaticNodeProvider;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNodeProvider;

use std::path::PathBuf;
use strig_core::{LabelExpr, OsFamily};

/// A machine a check can run on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub labels: Vec<String>,
    /// Working root; `None` while the node is offline
    pub root: Option<PathBuf>,
    pub os: OsFamily,
}

impl Node {
    pub fn new(name: impl Into<String>, root: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            labels: Vec::new(),
            root,
            os: OsFamily::current(),
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_os(mut self, os: OsFamily) -> Self {
        self.os = os;
        self
    }

    pub fn is_online(&self) -> bool {
        self.root.is_some()
    }

    /// Labels used for matching; a node always carries its own name
    pub fn assigned_labels(&self) -> Vec<&str> {
        std::iter::once(self.name.as_str())
            .chain(self.labels.iter().map(String::as_str))
            .collect()
    }
}

/// Registry of nodes, consulted fresh on every cycle
pub trait NodeProvider: Clone + Send + Sync + 'static {
    /// The controller node
    fn controller(&self) -> Node;

    /// Every node, controller first
    fn all_nodes(&self) -> Vec<Node>;

    /// Nodes whose labels satisfy `label`, in registry order
    fn nodes_for_label(&self, label: &LabelExpr) -> Vec<Node> {
        self.all_nodes()
            .into_iter()
            .filter(|n| label.matches(&n.assigned_labels()))
            .collect()
    }
}
