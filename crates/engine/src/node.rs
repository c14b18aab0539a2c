// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Choosing the node a cycle runs on

use strig_adapters::{Node, NodeProvider};
use strig_core::LabelExpr;

/// Logged when no node can take the cycle
pub const NO_NODE_AVAILABLE: &str =
    "Can't find any complete active node for the polling action. Maybe slaves are not yet active at this time or the number of executor of the master is 0. Checking again in next polling schedule.";

/// The controller when there is no label, otherwise the first online node
/// whose labels satisfy it. `None` when nothing qualifies.
pub fn select_node<P: NodeProvider>(nodes: &P, label: Option<&LabelExpr>) -> Option<Node> {
    match label {
        None => Some(nodes.controller()).filter(Node::is_online),
        Some(label) => nodes
            .nodes_for_label(label)
            .into_iter()
            .find(Node::is_online),
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
