// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use strig_core::Bindings;

fn discard(_: &str) {}

fn node() -> Node {
    Node::new("agent", Some(PathBuf::from("/agent")))
}

#[tokio::test]
async fn fake_records_calls_in_order() {
    let channel = FakeChannel::new();
    channel.add_file("run.sh", "exit 0");

    assert!(channel.file_exists(&node(), "run.sh").await.unwrap());
    channel.read_file(&node(), "run.sh").await.unwrap();

    assert_eq!(
        channel.calls(),
        vec![
            ChannelCall::FileExists {
                node: "agent".to_string(),
                path: "run.sh".to_string()
            },
            ChannelCall::ReadFile {
                node: "agent".to_string(),
                path: "run.sh".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn fake_serves_queued_exit_codes_then_zero() {
    let channel = FakeChannel::new();
    channel.push_exit_code(3);
    let request = LaunchRequest {
        command: vec!["sh".to_string()],
        env: BTreeMap::new(),
        cwd: PathBuf::from("/agent"),
    };

    let first = channel.launch(&node(), request.clone(), &discard).await.unwrap();
    let second = channel.launch(&node(), request, &discard).await.unwrap();
    assert_eq!(first.exit_code, 3);
    assert_eq!(second.exit_code, 0);
    assert_eq!(channel.launches().len(), 2);
}

#[tokio::test]
async fn fake_forwards_configured_output_lines() {
    let channel = FakeChannel::new();
    channel.set_output(&["+ exit 0", "done"]);
    let seen = std::sync::Mutex::new(Vec::new());
    let sink = |line: &str| seen.lock().unwrap().push(line.to_string());

    let outcome = channel
        .launch(
            &node(),
            LaunchRequest {
                command: vec!["sh".to_string()],
                env: BTreeMap::new(),
                cwd: PathBuf::from("/agent"),
            },
            &sink,
        )
        .await
        .unwrap();

    assert_eq!(outcome.lines, 2);
    assert_eq!(*seen.lock().unwrap(), vec!["+ exit 0", "done"]);
}

#[tokio::test]
async fn fake_tracks_temp_script_cleanup() {
    let channel = FakeChannel::new();
    let path = channel
        .create_temp_script(&node(), "exit 0", ".sh")
        .await
        .unwrap();
    assert_eq!(path, PathBuf::from("/agent/strig1.sh"));
    assert_eq!(channel.live_temp_scripts(), vec![path.clone()]);

    channel.delete_file(&node(), &path).await.unwrap();
    assert!(channel.live_temp_scripts().is_empty());
}

#[tokio::test]
async fn fake_delete_failure() {
    let channel = FakeChannel::new();
    channel.fail_delete();
    let path = channel.create_temp_script(&node(), "", ".sh").await.unwrap();
    assert!(channel.delete_file(&node(), &path).await.is_err());
    assert_eq!(channel.live_temp_scripts(), vec![path]);
}

#[tokio::test]
async fn fake_evaluates_with_minijinja_by_default() {
    let channel = FakeChannel::new();
    channel.push_evaluation(Err(ChannelError::Evaluation("canned".to_string())));
    let request = EvalRequest {
        source: "true".to_string(),
        bindings: Bindings::default(),
    };

    assert!(channel.evaluate(&node(), request.clone()).await.is_err());
    assert!(channel.evaluate(&node(), request).await.unwrap().is_true());
}
