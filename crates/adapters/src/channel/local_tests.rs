// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use strig_core::{Bindings, EvaluationError};

fn node(root: &Path) -> Node {
    Node::new("local", Some(root.to_path_buf()))
}

fn discard(_: &str) {}

/// Sink collecting every forwarded line
#[derive(Default)]
struct Collected(std::sync::Mutex<Vec<String>>);

impl Collected {
    fn sink(&self) -> impl Fn(&str) + Send + Sync + '_ {
        move |line: &str| self.0.lock().unwrap().push(line.to_string())
    }

    fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

fn sh(script: &str, cwd: &Path) -> LaunchRequest {
    LaunchRequest {
        command: vec!["/bin/sh".to_string(), "-c".to_string(), script.to_string()],
        env: path_env(),
        cwd: cwd.to_path_buf(),
    }
}

fn path_env() -> BTreeMap<String, String> {
    std::env::vars().filter(|(k, _)| k == "PATH").collect()
}

#[tokio::test]
async fn offline_node_is_rejected() {
    let channel = LocalChannel::default();
    let offline = Node::new("gone", None);
    assert_eq!(
        channel.environment(&offline).await.unwrap_err(),
        ChannelError::Offline("gone".to_string())
    );
    assert!(matches!(
        channel.file_exists(&offline, "relative.txt").await,
        Err(ChannelError::Offline(_))
    ));
}

#[tokio::test]
async fn relative_paths_resolve_against_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("check.sh"), "exit 0").unwrap();
    let channel = LocalChannel::default();
    let node = node(dir.path());

    assert!(channel.file_exists(&node, "check.sh").await.unwrap());
    assert!(!channel.file_exists(&node, "missing.sh").await.unwrap());
    assert_eq!(channel.read_file(&node, "check.sh").await.unwrap(), "exit 0");
}

#[tokio::test]
async fn temp_scripts_live_in_root_until_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let channel = LocalChannel::default();
    let node = node(dir.path());

    let path = channel
        .create_temp_script(&node, "echo hi\n", ".sh")
        .await
        .unwrap();
    assert!(path.starts_with(dir.path()));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("sh"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "echo hi\n");

    channel.delete_file(&node, &path).await.unwrap();
    assert!(!path.exists());
    assert!(matches!(
        channel.delete_file(&node, &path).await,
        Err(ChannelError::Io(_))
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn launch_collects_exit_code_and_output() {
    let dir = tempfile::tempdir().unwrap();
    let channel = LocalChannel::default();
    let node = node(dir.path());
    let collected = Collected::default();

    let mut env = path_env();
    env.insert("GREETING".to_string(), "hello".to_string());
    let outcome = channel
        .launch(
            &node,
            LaunchRequest {
                command: vec![
                    "/bin/sh".to_string(),
                    "-c".to_string(),
                    "echo $GREETING; echo oops >&2; pwd; exit 3".to_string(),
                ],
                env,
                cwd: dir.path().to_path_buf(),
            },
            &collected.sink(),
        )
        .await
        .unwrap();

    let output = collected.lines();
    assert_eq!(outcome.exit_code, 3);
    assert_eq!(outcome.lines, 3);
    assert!(output.contains(&"hello".to_string()));
    assert!(output.contains(&"oops".to_string()));
    let cwd = dir.path().canonicalize().unwrap();
    assert!(output
        .iter()
        .any(|l| std::path::Path::new(l).canonicalize().ok() == Some(cwd.clone())));
}

#[cfg(unix)]
#[tokio::test]
async fn signal_termination_reports_minus_one() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = LocalChannel::default()
        .launch(
            &node(dir.path()),
            LaunchRequest {
                command: vec!["/bin/sh".into(), "-c".into(), "kill -9 $$".into()],
                env: path_env(),
                cwd: dir.path().to_path_buf(),
            },
            &discard,
        )
        .await
        .unwrap();
    assert_eq!(outcome.exit_code, -1);
}

#[cfg(unix)]
#[tokio::test]
async fn invalid_utf8_output_keeps_the_pipe_drained() {
    let dir = tempfile::tempdir().unwrap();
    let collected = Collected::default();
    // Far more than a pipe buffer after the bad byte
    let script = r#"printf 'caf\351\n'; i=0; while [ $i -lt 3000 ]; do echo "line $i ................................................................"; i=$((i+1)); done; exit 4"#;

    let outcome = tokio::time::timeout(
        std::time::Duration::from_secs(30),
        LocalChannel::default().launch(
            &node(dir.path()),
            sh(script, dir.path()),
            &collected.sink(),
        ),
    )
    .await
    .expect("launch must not stall on undecodable output")
    .unwrap();

    let output = collected.lines();
    assert_eq!(outcome.exit_code, 4);
    assert_eq!(output.len(), 3001);
    assert_eq!(output[0], "caf\u{FFFD}");
    assert!(output[3000].starts_with("line 2999 "));
}

#[cfg(unix)]
#[tokio::test]
async fn output_is_forwarded_while_the_process_runs() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("seen");
    let sink = |line: &str| {
        if line == "started" {
            std::fs::write(&marker, "").unwrap();
        }
    };
    // Exits 0 only if the sink saw "started" before the script finished
    let script = "echo started; i=0; while [ $i -lt 100 ]; do [ -f seen ] && exit 0; sleep 0.1; i=$((i+1)); done; exit 9";

    let outcome = LocalChannel::default()
        .launch(&node(dir.path()), sh(script, dir.path()), &sink)
        .await
        .unwrap();
    assert_eq!(outcome.exit_code, 0);
}

#[tokio::test]
async fn missing_program_is_a_launch_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = LocalChannel::default()
        .launch(
            &node(dir.path()),
            LaunchRequest {
                command: vec!["/definitely/not/here".to_string()],
                env: BTreeMap::new(),
                cwd: dir.path().to_path_buf(),
            },
            &discard,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ChannelError::Launch(_)));
}

#[tokio::test]
async fn evaluate_uses_the_evaluator() {
    let dir = tempfile::tempdir().unwrap();
    let channel = LocalChannel::default();
    let result = channel
        .evaluate(
            &node(dir.path()),
            EvalRequest {
                source: "1 < 2".to_string(),
                bindings: Bindings::default(),
            },
        )
        .await
        .unwrap();
    assert!(result.is_true());
}

struct PanickingEvaluator;

impl ExpressionEvaluator for PanickingEvaluator {
    fn evaluate(&self, _: &str, _: &Bindings) -> Result<Evaluation, EvaluationError> {
        panic!("evaluator blew up")
    }
}

#[tokio::test]
async fn evaluator_panic_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let channel = LocalChannel::new(Arc::new(PanickingEvaluator));
    let err = channel
        .evaluate(
            &node(dir.path()),
            EvalRequest {
                source: "true".to_string(),
                bindings: Bindings::default(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ChannelError::Panicked(_)));
}
