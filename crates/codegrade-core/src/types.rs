//! Request, result, and verdict types shared by the executor and harness.

use serde::{Deserialize, Serialize};

use crate::runtime::Language;

/// A single test case, owned by the calling feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Fed to the program as stdin.
    #[serde(default)]
    pub input: String,

    /// Expected stdout (compared after trimming).
    #[serde(alias = "output")]
    pub expected_output: String,

    /// Whether the case must be redacted outside privileged contexts.
    #[serde(default)]
    pub is_hidden: bool,
}

impl TestCase {
    pub fn new(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
            is_hidden: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }
}

/// Provider-agnostic execution request for one run.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionRequest<'a> {
    pub language: Language,
    pub source_code: &'a str,
    pub stdin: &'a str,
}

/// Normalized result of one run, identical in shape across providers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub time_ms: u64,
    pub exit_code: i32,
}

/// Outcome of one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseVerdict {
    pub index: usize,
    pub is_hidden: bool,
    pub input: String,
    pub expected_output: String,
    pub stdout: String,
    pub stderr: String,
    pub time_ms: u64,
    pub exit_code: i32,
    pub passed: bool,
}

/// Aggregated outcome for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchVerdict {
    pub passed_count: usize,
    pub total_tests: usize,
    pub results: Vec<TestCaseVerdict>,
}

impl BatchVerdict {
    pub fn all_passed(&self) -> bool {
        self.passed_count == self.total_tests
    }
}
