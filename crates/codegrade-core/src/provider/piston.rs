//! Synchronous execute adapter (`POST {base}/api/v2/execute`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http::{Auth, HttpBackend};
use super::{seconds_to_ms, CallBudget, Provider};
use crate::config::ProviderKind;
use crate::error::{JudgeError, JudgeResult, STATUS_BAD_GATEWAY};
use crate::types::{ExecutionRequest, ExecutionResult};

const EXECUTE_PATH: &str = "/api/v2/execute";

#[derive(Debug, Serialize)]
struct ExecuteBody<'a> {
    language: &'a str,
    version: &'a str,
    files: [SourceFile<'a>; 1],
    stdin: &'a str,
}

#[derive(Debug, Serialize)]
struct SourceFile<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    #[serde(default)]
    run: Option<Stage>,
    #[serde(default)]
    compile: Option<Stage>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Stage {
    #[serde(default)]
    stdout: Option<String>,
    #[serde(default)]
    stderr: Option<String>,
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    code: Option<i32>,
    #[serde(default)]
    time: Option<serde_json::Value>,
}

impl Stage {
    /// Exit code; a missing code means the process was killed by a signal.
    fn exit_code(&self) -> i32 {
        self.code.unwrap_or(1)
    }

    fn into_result(self) -> ExecutionResult {
        let exit_code = self.exit_code();
        ExecutionResult {
            time_ms: seconds_to_ms(self.time.as_ref()),
            stdout: self.stdout.unwrap_or_default(),
            stderr: self.stderr.unwrap_or_default(),
            exit_code,
        }
    }

    /// Compiler diagnostics land in stderr; some toolchains only fill the
    /// combined stream or stdout.
    fn into_compile_failure(self) -> ExecutionResult {
        let exit_code = self.exit_code();
        let diagnostics = [self.stderr, self.output, self.stdout]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or_default();
        ExecutionResult {
            stdout: String::new(),
            stderr: diagnostics,
            time_ms: seconds_to_ms(self.time.as_ref()),
            exit_code,
        }
    }
}

impl ExecuteResponse {
    fn normalize(self) -> JudgeResult<ExecutionResult> {
        if let Some(compile) = self.compile {
            if compile.exit_code() != 0 {
                return Ok(compile.into_compile_failure());
            }
        }

        match self.run {
            Some(run) => Ok(run.into_result()),
            None => Err(JudgeError::service(
                STATUS_BAD_GATEWAY,
                format!(
                    "execution response missing run stage{}",
                    self.message
                        .map(|m| format!(": {}", m))
                        .unwrap_or_default()
                ),
            )),
        }
    }
}

/// Adapter for piston-style execution services.
#[derive(Debug, Clone)]
pub struct PistonProvider {
    http: HttpBackend,
}

impl PistonProvider {
    pub fn new(base_url: &str, api_key: Option<&str>) -> JudgeResult<Self> {
        Ok(Self {
            http: HttpBackend::new(base_url, Auth::bearer(api_key))?,
        })
    }
}

#[async_trait]
impl Provider for PistonProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Piston
    }

    async fn execute(
        &self,
        request: ExecutionRequest<'_>,
        budget: &CallBudget,
    ) -> JudgeResult<ExecutionResult> {
        let runtime = request.language.runtime();
        let url = self.http.url(EXECUTE_PATH);
        let body = ExecuteBody {
            language: runtime.piston_language,
            version: runtime.piston_version,
            files: [SourceFile {
                content: request.source_code,
            }],
            stdin: request.stdin,
        };

        debug!(
            url = %url,
            language = runtime.piston_language,
            version = runtime.piston_version,
            "dispatching to piston"
        );

        let response: ExecuteResponse = budget
            .guard(self.http.post_json(&url, &body))
            .await?;
        response.normalize()
    }
}
