use anyhow::{Context, Result};
use codegrade_core::JudgeError;
use std::path::Path;
use tokio_util::sync::CancellationToken;

use crate::exit_codes;

mod dispatch;
pub(crate) mod exec;
pub(crate) mod languages;
pub(crate) mod run;

pub use dispatch::dispatch;

/// Print an engine error and map it to the process exit code.
pub(crate) fn report(err: &JudgeError) -> i32 {
    eprintln!("error: {err}");
    exit_codes::for_error(err)
}

pub(crate) fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read source file {}", path.display()))
}

/// Token cancelled on Ctrl-C, so an in-flight sandbox call is aborted.
pub(crate) fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling execution");
            trigger.cancel();
        }
    });
    token
}
