#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const ENV_VARS: [&str; 6] = [
    "CODEGRADE_EXECUTION_URL",
    "CODEGRADE_EXECUTION_PROVIDER",
    "CODEGRADE_EXECUTION_API_KEY",
    "CODEGRADE_EXECUTION_TIMEOUT_MS",
    "CODEGRADE_JUDGE0_CPU_TIME_LIMIT",
    "CODEGRADE_JUDGE0_MEMORY_LIMIT",
];

/// Piston-style service where every program echoes its stdin.
struct PistonEcho;

impl Respond for PistonEcho {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let stdin = body["stdin"].as_str().unwrap_or_default();
        ResponseTemplate::new(200).set_body_json(json!({
            "run": {"stdout": format!("{stdin}\n"), "stderr": "", "code": 0, "time": 0.004}
        }))
    }
}

fn codegrade() -> Command {
    let mut cmd = Command::cargo_bin("codegrade").expect("codegrade binary");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "off");
    cmd
}

fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

fn echo_source() -> NamedTempFile {
    temp_file(".py", "print(input())\n")
}

fn cases_yaml() -> NamedTempFile {
    temp_file(
        ".yaml",
        "- input: \"5\"\n  output: \"5\"\n- input: \"top secret\"\n  output: \"top secret\"\n  isHidden: true\n",
    )
}

async fn piston_echo_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/execute"))
        .respond_with(PistonEcho)
        .mount(&server)
        .await;
    server
}

#[test]
fn test_languages_lists_registry() {
    codegrade()
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("python"))
        .stdout(predicate::str::contains("py, python3"))
        .stdout(predicate::str::contains("judge0 54"));
}

#[test]
fn test_languages_json() {
    let output = codegrade()
        .args(["languages", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let listing: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listing.len(), 8);
    assert_eq!(listing[0]["name"], "python");
    assert_eq!(listing[0]["judge0Id"], 71);
}

#[test]
fn test_run_without_base_url_exits_config_error() {
    let code = echo_source();
    let cases = cases_yaml();

    codegrade()
        .arg("run")
        .arg("--code")
        .arg(code.path())
        .args(["--language", "python", "--cases"])
        .arg(cases.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("base URL"));
}

#[test]
fn test_run_missing_source_exits_config_error() {
    let cases = cases_yaml();

    codegrade()
        .args(["run", "--code", "/definitely/missing/main.py"])
        .args(["--language", "python", "--cases"])
        .arg(cases.path())
        .args(["--url", "http://127.0.0.1:9"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read source file"));
}

#[test]
fn test_unknown_provider_exits_config_error() {
    let code = echo_source();

    codegrade()
        .arg("exec")
        .arg("--code")
        .arg(code.path())
        .args(["--language", "python", "--url", "http://127.0.0.1:9"])
        .args(["--provider", "hackerrank"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown execution provider"));
}

#[test]
fn test_zero_timeout_exits_config_error() {
    let code = echo_source();

    codegrade()
        .arg("exec")
        .arg("--code")
        .arg(code.path())
        .args(["--language", "python", "--url", "http://127.0.0.1:9"])
        .env("CODEGRADE_EXECUTION_TIMEOUT_MS", "0")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("timeout must be greater than zero"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_all_passed_redacts_hidden_cases() {
    let server = piston_echo_server().await;
    let code = echo_source();
    let cases = cases_yaml();

    let output = codegrade()
        .arg("run")
        .arg("--code")
        .arg(code.path())
        .args(["--language", "python", "--format", "json", "--cases"])
        .arg(cases.path())
        .args(["--url", &server.uri()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let verdict: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(verdict["passedCount"], 2);
    assert_eq!(verdict["totalTests"], 2);
    assert_eq!(verdict["results"][0]["input"], "5");
    assert_eq!(verdict["results"][1]["isHidden"], true);
    assert_eq!(verdict["results"][1]["input"], "");
    assert_eq!(verdict["results"][1]["passed"], true);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_reveal_hidden_keeps_io() {
    let server = piston_echo_server().await;
    let code = echo_source();
    let cases = cases_yaml();

    let output = codegrade()
        .arg("run")
        .arg("--code")
        .arg(code.path())
        .args(["--language", "py", "--format", "json", "--reveal-hidden", "--cases"])
        .arg(cases.path())
        .args(["--url", &server.uri()])
        .output()
        .unwrap();

    let verdict: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(verdict["results"][1]["input"], "top secret");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_wrong_answer_exits_tests_failed() {
    let server = piston_echo_server().await;
    let code = echo_source();
    let cases = temp_file(".json", r#"[{"input": "5", "output": "6"}]"#);

    codegrade()
        .arg("run")
        .arg("--code")
        .arg(code.path())
        .args(["--language", "python", "--cases"])
        .arg(cases.path())
        .args(["--url", &server.uri()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAIL"))
        .stdout(predicate::str::contains("passed 0/1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_service_failure_exits_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("sandbox down"))
        .mount(&server)
        .await;
    let code = echo_source();
    let cases = cases_yaml();

    codegrade()
        .arg("run")
        .arg("--code")
        .arg(code.path())
        .args(["--language", "python", "--cases"])
        .arg(cases.path())
        .args(["--url", &server.uri()])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("500"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_exec_prints_execution_result() {
    let server = piston_echo_server().await;
    let code = echo_source();

    let output = codegrade()
        .arg("exec")
        .arg("--code")
        .arg(code.path())
        .args(["--language", "python", "--stdin", "hello"])
        .env("CODEGRADE_EXECUTION_URL", server.uri())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["stdout"], "hello\n");
    assert_eq!(result["exitCode"], 0);
    assert_eq!(result["timeMs"], 4);
}
