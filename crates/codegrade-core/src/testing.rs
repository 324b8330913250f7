//! In-process provider double for executor and harness tests.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ProviderKind;
use crate::error::JudgeResult;
use crate::provider::{CallBudget, Provider};
use crate::runtime::Language;
use crate::types::{ExecutionRequest, ExecutionResult};

type Script =
    dyn for<'a, 'b> Fn(usize, &'a ExecutionRequest<'b>) -> JudgeResult<ExecutionResult> + Send + Sync;

/// Provider whose responses come from a closure `(call_index, request)`.
pub(crate) struct ScriptedProvider {
    script: Box<Script>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(Language, String)>>,
}

impl fmt::Debug for ScriptedProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedProvider")
            .field("calls", &self.calls.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl ScriptedProvider {
    pub(crate) fn new<F>(script: F) -> Self
    where
        F: for<'a, 'b> Fn(usize, &'a ExecutionRequest<'b>) -> JudgeResult<ExecutionResult>
            + Send
            + Sync
            + 'static,
    {
        Self {
            script: Box::new(script),
            delay: None,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Program that prints its stdin followed by a newline.
    pub(crate) fn echo() -> Self {
        Self::new(|_, req| {
            Ok(ExecutionResult {
                stdout: format!("{}\n", req.stdin),
                stderr: String::new(),
                time_ms: 3,
                exit_code: 0,
            })
        })
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn languages(&self) -> Vec<Language> {
        self.seen.lock().unwrap().iter().map(|(l, _)| *l).collect()
    }

    pub(crate) fn stdins(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|(_, s)| s.clone()).collect()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Piston
    }

    async fn execute(
        &self,
        request: ExecutionRequest<'_>,
        budget: &CallBudget,
    ) -> JudgeResult<ExecutionResult> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((request.language, request.stdin.to_string()));

        budget
            .guard(async {
                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }
                (self.script)(index, &request)
            })
            .await
    }
}
