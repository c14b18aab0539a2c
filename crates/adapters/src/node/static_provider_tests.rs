// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::PathBuf;
use strig_core::{LabelExpr, OsFamily};

const CONFIG: &str = r#"
[controller]
root = "/ctl"
labels = ["master"]

[[node]]
name = "linux-1"
root = "/srv/a"
labels = ["linux", "docker"]

[[node]]
name = "linux-2"
root = "/srv/b"
online = false
labels = ["linux"]

[[node]]
name = "win-1"
root = "C:/agent"
labels = ["windows"]
os = "windows"
"#;

fn provider() -> StaticNodeProvider {
    StaticNodeProvider::from_settings(&Settings::from_toml(CONFIG).unwrap())
}

#[test]
fn controller_comes_from_settings() {
    let controller = provider().controller();
    assert_eq!(controller.name, "built-in");
    assert_eq!(controller.root, Some(PathBuf::from("/ctl")));
    assert_eq!(controller.labels, vec!["master"]);
}

#[test]
fn all_nodes_lists_controller_first() {
    let names: Vec<String> = provider().all_nodes().into_iter().map(|n| n.name).collect();
    assert_eq!(names, vec!["built-in", "linux-1", "linux-2", "win-1"]);
}

#[test]
fn offline_nodes_have_no_root() {
    let nodes = provider().all_nodes();
    assert!(nodes[1].is_online());
    assert!(!nodes[2].is_online());
    assert_eq!(nodes[3].os, OsFamily::Windows);
}

#[test]
fn label_selection_keeps_registry_order() {
    let label = LabelExpr::parse("linux && !windows").unwrap();
    let names: Vec<String> = provider()
        .nodes_for_label(&label)
        .into_iter()
        .map(|n| n.name)
        .collect();
    assert_eq!(names, vec!["linux-1", "linux-2"]);
}

#[test]
fn node_name_is_a_label() {
    let label = LabelExpr::parse("win-1").unwrap();
    let nodes = provider().nodes_for_label(&label);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].name, "win-1");
}
