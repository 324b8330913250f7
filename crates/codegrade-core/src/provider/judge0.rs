//! Queued-judge adapter (`POST {base}/submissions?base64_encoded=true&wait=true`).
//!
//! Source and stdin travel base64-encoded and so do the output fields. The
//! provider's status id is folded into an exit code.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http::{Auth, HttpBackend};
use super::{seconds_to_ms, CallBudget, Provider};
use crate::config::ProviderKind;
use crate::error::{JudgeError, JudgeResult, STATUS_BAD_GATEWAY};
use crate::types::{ExecutionRequest, ExecutionResult};

const SUBMISSIONS_PATH: &str = "/submissions?base64_encoded=true&wait=true";

/// Status ids reported by the judge.
const STATUS_ACCEPTED: u32 = 3;
const STATUS_INTERNAL_ERROR: u32 = 13;

#[derive(Debug, Serialize)]
struct SubmissionBody {
    language_id: u32,
    source_code: String,
    stdin: String,
    redirect_stderr_to_stdout: bool,
    cpu_time_limit: f64,
    memory_limit: u64,
}

#[derive(Debug, Deserialize)]
struct SubmissionResponse {
    #[serde(default)]
    stdout: Option<String>,
    #[serde(default)]
    stderr: Option<String>,
    #[serde(default)]
    compile_output: Option<String>,
    #[serde(default)]
    time: Option<serde_json::Value>,
    #[serde(default)]
    status: Option<SubmissionStatus>,
}

#[derive(Debug, Deserialize)]
struct SubmissionStatus {
    id: u32,
    #[serde(default)]
    description: String,
}

/// Decode one base64 output field. The judge wraps encoded lines, so
/// whitespace is stripped before decoding; invalid UTF-8 is replaced.
fn decode_field(name: &str, value: Option<String>) -> JudgeResult<String> {
    let Some(encoded) = value else {
        return Ok(String::new());
    };
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact.as_bytes()).map_err(|e| {
        JudgeError::service(
            STATUS_BAD_GATEWAY,
            format!("invalid base64 in {} field: {}", name, e),
        )
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

impl SubmissionResponse {
    fn normalize(self) -> JudgeResult<ExecutionResult> {
        let status = self.status.ok_or_else(|| {
            JudgeError::service(STATUS_BAD_GATEWAY, "submission response missing status")
        })?;

        if status.id == STATUS_INTERNAL_ERROR {
            return Err(JudgeError::service(
                STATUS_BAD_GATEWAY,
                format!("judge internal error: {}", status.description),
            ));
        }

        let stdout = decode_field("stdout", self.stdout)?;
        let stderr = decode_field("stderr", self.stderr)?;
        let compile_output = decode_field("compile_output", self.compile_output)?;

        Ok(ExecutionResult {
            stdout,
            stderr: if compile_output.is_empty() {
                stderr
            } else {
                compile_output
            },
            time_ms: seconds_to_ms(self.time.as_ref()),
            exit_code: if status.id == STATUS_ACCEPTED { 0 } else { 1 },
        })
    }
}

/// Adapter for judge0-style execution services.
#[derive(Debug, Clone)]
pub struct Judge0Provider {
    http: HttpBackend,
    cpu_time_limit_secs: f64,
    memory_limit_kb: u64,
}

impl Judge0Provider {
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        cpu_time_limit_secs: f64,
        memory_limit_kb: u64,
    ) -> JudgeResult<Self> {
        Ok(Self {
            http: HttpBackend::new(base_url, Auth::api_key(api_key))?,
            cpu_time_limit_secs,
            memory_limit_kb,
        })
    }

    fn body(&self, request: &ExecutionRequest<'_>) -> SubmissionBody {
        SubmissionBody {
            language_id: request.language.runtime().judge0_id,
            source_code: STANDARD.encode(request.source_code),
            stdin: STANDARD.encode(request.stdin),
            redirect_stderr_to_stdout: true,
            cpu_time_limit: self.cpu_time_limit_secs,
            memory_limit: self.memory_limit_kb,
        }
    }
}

#[async_trait]
impl Provider for Judge0Provider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Judge0
    }

    async fn execute(
        &self,
        request: ExecutionRequest<'_>,
        budget: &CallBudget,
    ) -> JudgeResult<ExecutionResult> {
        let url = self.http.url(SUBMISSIONS_PATH);
        let body = self.body(&request);

        debug!(
            url = %url,
            language_id = body.language_id,
            "dispatching to judge0"
        );

        let response: SubmissionResponse = budget
            .guard(self.http.post_json(&url, &body))
            .await?;
        if let Some(status) = &response.status {
            if status.id != STATUS_ACCEPTED {
                debug!(
                    status_id = status.id,
                    status = %status.description,
                    "submission not accepted"
                );
            }
        }
        response.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Language;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> SubmissionResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_accepted() {
        let result = parse(json!({
            "stdout": "NQo=",
            "stderr": null,
            "compile_output": null,
            "time": "0.012",
            "memory": 3200,
            "status": {"id": 3, "description": "Accepted"}
        }))
        .normalize()
        .unwrap();

        assert_eq!(
            result,
            ExecutionResult {
                stdout: "5\n".into(),
                stderr: String::new(),
                time_ms: 12,
                exit_code: 0,
            }
        );
    }

    #[test]
    fn test_normalize_compile_error_falls_back_to_compile_output() {
        let result = parse(json!({
            "stdout": null,
            "stderr": null,
            "compile_output": STANDARD.encode("main.c:1: error: expected ';'"),
            "time": null,
            "status": {"id": 6, "description": "Compilation Error"}
        }))
        .normalize()
        .unwrap();

        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stderr, "main.c:1: error: expected ';'");
        assert!(result.stdout.is_empty());
        assert_eq!(result.time_ms, 0);
    }

    #[test]
    fn test_normalize_runtime_error_nonzero_exit() {
        let result = parse(json!({
            "stdout": STANDARD.encode("partial"),
            "stderr": STANDARD.encode("Traceback"),
            "time": 0.2,
            "status": {"id": 11, "description": "Runtime Error (NZEC)"}
        }))
        .normalize()
        .unwrap();
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stdout, "partial");
        assert_eq!(result.stderr, "Traceback");
        assert_eq!(result.time_ms, 200);
    }

    #[test]
    fn test_decode_wrapped_base64() {
        let encoded = STANDARD.encode("a".repeat(80));
        let wrapped = format!("{}\n{}\n", &encoded[..60], &encoded[60..]);
        assert_eq!(decode_field("stdout", Some(wrapped)).unwrap(), "a".repeat(80));
    }

    #[test]
    fn test_decode_invalid_base64_is_service_error() {
        let err = decode_field("stdout", Some("%%%".into())).unwrap_err();
        assert_eq!(err.status(), 502);
        assert!(err.message().contains("stdout"));
    }

    #[test]
    fn test_internal_error_is_service_error() {
        let err = parse(json!({"status": {"id": 13, "description": "Internal Error"}}))
            .normalize()
            .unwrap_err();
        assert!(!err.is_config());
        assert_eq!(err.status(), 502);
    }

    #[test]
    fn test_missing_status_is_service_error() {
        let err = parse(json!({"token": "d85cd024-1548-4165-96c7-7bc88673f194"}))
            .normalize()
            .unwrap_err();
        assert!(err.message().contains("missing status"));
    }

    #[test]
    fn test_request_body_wire_shape() {
        let provider = Judge0Provider::new("http://judge0", None, 2.0, 128_000).unwrap();
        let body = provider.body(&ExecutionRequest {
            language: Language::Python,
            source_code: "print(input())",
            stdin: "5",
        });

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "language_id": 71,
                "source_code": "cHJpbnQoaW5wdXQoKSk=",
                "stdin": "NQ==",
                "redirect_stderr_to_stdout": true,
                "cpu_time_limit": 2.0,
                "memory_limit": 128000
            })
        );
    }
}
