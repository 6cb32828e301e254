use std::io::Read;

use tempfile::NamedTempFile;

use super::{Executor, ExecutorError};

#[test]
fn setup_can_write_to_a_real_file() {
    let file = NamedTempFile::new().expect("should create a tempfile");
    let path = file.path().to_str().unwrap().to_string();

    let executor = Executor::new(vec![
        "sh".to_string(),
        "-c".to_string(),
        format!("echo provisioned > {path}"),
    ]);
    executor.run().expect("command should succeed");

    let mut contents = String::new();
    std::fs::File::open(&path)
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents.trim(), "provisioned");
}

#[test]
fn captures_stdout_and_stderr() {
    let executor = Executor::new(vec![
        "sh".to_string(),
        "-c".to_string(),
        "echo out-line; echo err-line 1>&2".to_string(),
    ]);
    let output = executor.run().expect("command should succeed");
    assert_eq!(output.stdout.len(), 1);
    assert_eq!(output.stdout[0].line, "out-line");
    assert_eq!(output.stderr.len(), 1);
    assert_eq!(output.stderr[0].line, "err-line");
}

#[test]
fn nonzero_exit_is_an_error_with_stderr_tail() {
    let executor = Executor::new(vec![
        "sh".to_string(),
        "-c".to_string(),
        "echo failure-reason 1>&2; exit 7".to_string(),
    ]);
    match executor.run() {
        Err(ExecutorError::Exit { code, stderr_tail }) => {
            assert_eq!(code, Some(7));
            assert_eq!(stderr_tail, vec!["failure-reason".to_string()]);
        }
        other => panic!("expected Exit error, got {other:?}"),
    }
}

#[test]
fn missing_binary_is_a_spawn_error() {
    let executor = Executor::new(vec!["definitely-not-a-real-binary-xyz".to_string()]);
    match executor.run() {
        Err(ExecutorError::Spawn(_)) => {}
        other => panic!("expected Spawn error, got {other:?}"),
    }
}

#[test]
fn timestamps_are_monotonically_non_decreasing() {
    let executor = Executor::new(vec![
        "sh".to_string(),
        "-c".to_string(),
        "echo one; echo two; echo three".to_string(),
    ]);
    let output = executor.run().expect("command should succeed");
    for pair in output.stdout.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
}
