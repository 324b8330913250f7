//! CLI command: codegrade exec
//!
//! Run a submission once and print the normalized result as JSON.
//! The program's own exit code is reported in the JSON, not as ours.

use anyhow::Result;
use codegrade_core::{ExecutionResult, Executor, JudgeResult};

use super::super::args::ExecArgs;
use crate::exit_codes;

pub async fn run(args: ExecArgs) -> Result<i32> {
    let code = super::read_source(&args.code)?;

    match execute(&args, &code).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(exit_codes::SUCCESS)
        }
        Err(err) => Ok(super::report(&err)),
    }
}

async fn execute(args: &ExecArgs, code: &str) -> JudgeResult<ExecutionResult> {
    let config = args.execution.to_config()?;
    let executor = Executor::new(&config)?;
    let cancel = super::cancel_on_ctrl_c();
    executor
        .run_with_cancel(&args.language, code, &args.stdin, &cancel)
        .await
}
