// CLI integration tests for the minimal extraction flows.
use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_jsonsift");
    Command::new(exe)
}

fn parse_json(value: &str) -> Value {
    serde_json::from_str(value).expect("valid json")
}

fn run_with_stdin(args: &[&str], input: &str) -> std::process::Output {
    let mut child = cmd()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .as_mut()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait")
}

#[test]
fn extracts_from_a_file_argument() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("reply.txt");
    std::fs::write(
        &path,
        "Sure! Here is the summary:\n```json\n{\"status\": \"ok\", \"items\": 2}\n```\n",
    )
    .expect("write input");

    let output = cmd().arg(&path).output().expect("run");
    assert!(output.status.success());
    let value = parse_json(std::str::from_utf8(&output.stdout).expect("utf8"));
    assert_eq!(value.get("status").unwrap().as_str().unwrap(), "ok");
    assert_eq!(value.get("items").unwrap().as_u64().unwrap(), 2);
}

#[test]
fn compact_output_is_a_single_line() {
    let output = run_with_stdin(&["--compact"], "noise {a: 1, b: 'x',} noise");
    assert!(output.status.success());
    let stdout = std::str::from_utf8(&output.stdout).expect("utf8");
    assert_eq!(stdout.lines().count(), 1);
    assert_eq!(parse_json(stdout), serde_json::json!({"a": 1, "b": "x"}));
}

#[test]
fn extraction_failure_emits_json_error_and_exit_code_3() {
    let output = run_with_stdin(&[], "no payload in here");
    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());

    let stderr = std::str::from_utf8(&output.stderr).expect("utf8");
    let line = stderr
        .lines()
        .find(|line| line.starts_with('{'))
        .expect("json error line");
    let error = parse_json(line);
    let body = error.get("error").expect("error body");
    assert_eq!(body.get("kind").unwrap().as_str().unwrap(), "NotFound");
    assert_eq!(
        body.get("message").unwrap().as_str().unwrap(),
        "No valid JSON object found in response."
    );
}

#[test]
fn empty_input_exits_zero_with_no_output() {
    let output = run_with_stdin(&[], "");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_file_maps_to_io_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("does-not-exist.txt");

    let output = cmd().arg(&path).output().expect("run");
    assert_eq!(output.status.code(), Some(4));
    let stderr = std::str::from_utf8(&output.stderr).expect("utf8");
    let line = stderr
        .lines()
        .find(|line| line.starts_with('{'))
        .expect("json error line");
    let error = parse_json(line);
    assert_eq!(error["error"]["kind"].as_str().unwrap(), "Io");
}

#[test]
fn sse_mode_emits_one_line_per_recovered_message() {
    let chunk = "data: {\"a\": 1}\n\nevent: done\n\n{\"b\": 2}\n\n";
    let output = run_with_stdin(&["--sse"], chunk);
    assert!(output.status.success());

    let stdout = std::str::from_utf8(&output.stdout).expect("utf8");
    let values: Vec<Value> = stdout.lines().map(parse_json).collect();
    assert_eq!(
        values,
        vec![serde_json::json!({"a": 1}), serde_json::json!({"b": 2})]
    );
}

#[test]
fn sse_mode_with_no_payloads_fails() {
    let output = run_with_stdin(&["--sse"], "event: ping\n\nevent: pong\n\n");
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn completion_subcommand_generates_a_script() {
    let output = cmd().args(["completion", "bash"]).output().expect("run");
    assert!(output.status.success());
    let script = std::str::from_utf8(&output.stdout).expect("utf8");
    assert!(script.contains("jsonsift"));
}
