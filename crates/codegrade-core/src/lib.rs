//! Code judging engine.
//!
//! Runs untrusted submissions on an external sandboxed execution service,
//! compares each test case's stdout with the expected output, and returns a
//! deterministic verdict:
//!
//! - Runtime registry mapping language identifiers to provider parameters
//! - Two provider adapters (piston-style and judge0-style)
//! - Single-case executor with a hard per-call timeout and cancellation
//! - Sequential batch harness producing a [`BatchVerdict`]
//!
//! # Quick Start
//!
//! ```no_run
//! use codegrade_core::{run_test_cases, ExecutionConfig, TestCase};
//!
//! # async fn example() -> Result<(), codegrade_core::JudgeError> {
//! let config = ExecutionConfig::default().with_base_url("http://piston:2000");
//! let cases = vec![TestCase::new("5", "5")];
//!
//! let verdict = run_test_cases(&config, "print(input())", "python", &cases).await?;
//! println!("{}/{}", verdict.passed_count, verdict.total_tests);
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Every failure is a [`JudgeError`]: `Config` for deployment problems
//! (missing base URL, unsupported language, empty test list) and `Service`
//! for sandbox failures and timeouts. Both carry an HTTP-style status.
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `CODEGRADE_EXECUTION_URL` | Execution service base URL (required) |
//! | `CODEGRADE_EXECUTION_PROVIDER` | `piston` (default) or `judge0` |
//! | `CODEGRADE_EXECUTION_API_KEY` | Bearer token (piston) or `X-Auth-Token` (judge0) |
//! | `CODEGRADE_EXECUTION_TIMEOUT_MS` | Per-call budget in ms (default: 8000) |
//! | `CODEGRADE_JUDGE0_CPU_TIME_LIMIT` | Judge0 CPU seconds (default: 2) |
//! | `CODEGRADE_JUDGE0_MEMORY_LIMIT` | Judge0 memory in KB (default: 128000) |

pub mod config;
pub mod error;
pub mod executor;
pub mod harness;
pub mod provider;
pub mod runtime;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export main types
pub use config::{ExecutionConfig, ProviderKind};
pub use error::{JudgeError, JudgeResult};
pub use executor::Executor;
pub use harness::{outputs_match, run_test_cases, Harness};
pub use provider::{
    build_provider, CallBudget, Judge0Provider, PistonProvider, Provider, USER_AGENT,
};
pub use runtime::{resolve, Language, RuntimeConfig};
pub use types::{BatchVerdict, ExecutionRequest, ExecutionResult, TestCase, TestCaseVerdict};
