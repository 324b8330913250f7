//! Batch test harness: the single entry point every grading feature uses.
//!
//! Cases run one at a time, in input order. The first execution error
//! aborts the batch and is returned unchanged; a partial verdict is never
//! produced.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::ExecutionConfig;
use crate::error::{JudgeError, JudgeResult};
use crate::executor::Executor;
use crate::runtime;
use crate::types::{BatchVerdict, TestCase, TestCaseVerdict};

/// Exact comparison after trimming surrounding whitespace on both sides.
pub fn outputs_match(actual: &str, expected: &str) -> bool {
    actual.trim() == expected.trim()
}

/// Grades submissions against ordered test cases.
#[derive(Debug, Clone)]
pub struct Harness {
    executor: Executor,
}

impl Harness {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    pub fn from_config(config: &ExecutionConfig) -> JudgeResult<Self> {
        Executor::new(config).map(Self::new)
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub async fn run_test_cases(
        &self,
        code: &str,
        language: &str,
        test_cases: &[TestCase],
    ) -> JudgeResult<BatchVerdict> {
        self.run_test_cases_with_cancel(code, language, test_cases, &CancellationToken::new())
            .await
    }

    /// Like [`Harness::run_test_cases`]; cancelling `cancel` aborts the
    /// in-flight case and the rest of the batch.
    pub async fn run_test_cases_with_cancel(
        &self,
        code: &str,
        language: &str,
        test_cases: &[TestCase],
        cancel: &CancellationToken,
    ) -> JudgeResult<BatchVerdict> {
        if test_cases.is_empty() {
            return Err(JudgeError::no_test_cases());
        }
        let language = runtime::resolve(language)?.language;

        let mut results = Vec::with_capacity(test_cases.len());
        let mut passed_count = 0;

        for (index, case) in test_cases.iter().enumerate() {
            let execution = self
                .executor
                .run_resolved(language, code, &case.input, cancel)
                .await?;

            let passed = outputs_match(&execution.stdout, &case.expected_output);
            if passed {
                passed_count += 1;
            }
            debug!(index, passed, exit_code = execution.exit_code, "test case graded");

            results.push(TestCaseVerdict {
                index,
                is_hidden: case.is_hidden,
                input: case.input.clone(),
                expected_output: case.expected_output.clone(),
                stdout: execution.stdout,
                stderr: execution.stderr,
                time_ms: execution.time_ms,
                exit_code: execution.exit_code,
                passed,
            });
        }

        info!(
            language = %language,
            passed = passed_count,
            total = test_cases.len(),
            "batch graded"
        );

        Ok(BatchVerdict {
            passed_count,
            total_tests: test_cases.len(),
            results,
        })
    }
}

/// Grade `code` against `test_cases` using the adapter `config` selects.
pub async fn run_test_cases(
    config: &ExecutionConfig,
    code: &str,
    language: &str,
    test_cases: &[TestCase],
) -> JudgeResult<BatchVerdict> {
    Harness::from_config(config)?
        .run_test_cases(code, language, test_cases)
        .await
}
