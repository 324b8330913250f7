//! Provider adapters for remote execution services.
//!
//! Each adapter translates an [`ExecutionRequest`] into one judge's wire
//! protocol and normalizes the response into an [`ExecutionResult`]. Both
//! adapters run their network call under a [`CallBudget`] and surface every
//! failure as [`JudgeError`].

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::{ExecutionConfig, ProviderKind};
use crate::error::{JudgeError, JudgeResult};
use crate::types::{ExecutionRequest, ExecutionResult};

mod http;
mod judge0;
mod piston;

pub use judge0::Judge0Provider;
pub use piston::PistonProvider;

/// User agent sent with every execution request.
pub const USER_AGENT: &str = http::USER_AGENT_VALUE;

/// Wall-clock deadline plus cancellation for a single provider call.
#[derive(Debug, Clone)]
pub struct CallBudget {
    timeout: Duration,
    cancel: CancellationToken,
}

impl CallBudget {
    pub fn new(timeout: Duration, cancel: CancellationToken) -> Self {
        Self { timeout, cancel }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Drive `call` until it finishes, the budget elapses, or the token is
    /// cancelled. The losing branch is dropped, which aborts the request.
    pub async fn guard<T, F>(&self, call: F) -> JudgeResult<T>
    where
        F: Future<Output = JudgeResult<T>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(JudgeError::cancelled()),
            _ = tokio::time::sleep(self.timeout) => Err(JudgeError::timeout(self.timeout)),
            result = call => result,
        }
    }
}

/// A remote judge that can run one program against one stdin.
#[async_trait]
pub trait Provider: Send + Sync + fmt::Debug {
    fn kind(&self) -> ProviderKind;

    async fn execute(
        &self,
        request: ExecutionRequest<'_>,
        budget: &CallBudget,
    ) -> JudgeResult<ExecutionResult>;
}

/// Build the adapter selected by `config`.
pub fn build_provider(config: &ExecutionConfig) -> JudgeResult<Arc<dyn Provider>> {
    let base_url = config.require_base_url()?;
    let api_key = config.api_key.as_deref();

    let provider: Arc<dyn Provider> = match config.provider {
        ProviderKind::Piston => Arc::new(PistonProvider::new(base_url, api_key)?),
        ProviderKind::Judge0 => Arc::new(Judge0Provider::new(
            base_url,
            api_key,
            config.cpu_time_limit_secs,
            config.memory_limit_kb,
        )?),
    };
    Ok(provider)
}

/// Convert a provider time in seconds (number or numeric string) to ms.
pub(crate) fn seconds_to_ms(value: Option<&serde_json::Value>) -> u64 {
    let secs = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match secs {
        Some(s) if s.is_finite() && s > 0.0 => (s * 1000.0).round() as u64,
        _ => 0,
    }
}
