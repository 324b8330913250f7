//! Single-case executor: resolve language, pick the configured adapter, run
//! one program against one stdin under a fresh call budget.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::{ExecutionConfig, ProviderKind};
use crate::error::JudgeResult;
use crate::provider::{build_provider, CallBudget, Provider};
use crate::runtime::{self, Language};
use crate::types::{ExecutionRequest, ExecutionResult};

/// Runs single programs on the configured execution service.
///
/// Holds no mutable state; clone it freely across tasks.
#[derive(Debug, Clone)]
pub struct Executor {
    provider: Arc<dyn Provider>,
    timeout: Duration,
}

impl Executor {
    /// Build the executor for `config`. Fails with `ConfigError` when no
    /// base URL is configured or the timeout is zero.
    pub fn new(config: &ExecutionConfig) -> JudgeResult<Self> {
        config.validate()?;
        Ok(Self {
            provider: build_provider(config)?,
            timeout: config.timeout(),
        })
    }

    /// Use an explicit adapter (alternate providers, test doubles).
    pub fn with_provider(provider: Arc<dyn Provider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn run(
        &self,
        language: &str,
        code: &str,
        stdin: &str,
    ) -> JudgeResult<ExecutionResult> {
        self.run_with_cancel(language, code, stdin, &CancellationToken::new())
            .await
    }

    /// Like [`Executor::run`], aborting the in-flight call when `cancel` fires.
    pub async fn run_with_cancel(
        &self,
        language: &str,
        code: &str,
        stdin: &str,
        cancel: &CancellationToken,
    ) -> JudgeResult<ExecutionResult> {
        let runtime = runtime::resolve(language)?;
        self.run_resolved(runtime.language, code, stdin, cancel).await
    }

    pub(crate) async fn run_resolved(
        &self,
        language: Language,
        code: &str,
        stdin: &str,
        cancel: &CancellationToken,
    ) -> JudgeResult<ExecutionResult> {
        let budget = CallBudget::new(self.timeout, cancel.child_token());
        let request = ExecutionRequest {
            language,
            source_code: code,
            stdin,
        };

        let started = Instant::now();
        let result = self.provider.execute(request, &budget).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(r) => debug!(
                provider = %self.provider.kind(),
                language = %language,
                exit_code = r.exit_code,
                time_ms = r.time_ms,
                elapsed_ms,
                "execution finished"
            ),
            Err(e) => warn!(
                provider = %self.provider.kind(),
                language = %language,
                status = e.status(),
                error = %e,
                elapsed_ms,
                "execution failed"
            ),
        }

        result
    }
}
