//! Process exit codes for `codegrade`.
//! These codes are part of the public contract; scripts branch on them.

use codegrade_core::JudgeError;

pub const SUCCESS: i32 = 0;
pub const TESTS_FAILED: i32 = 1; // Graded, at least one case failed
pub const CONFIG_ERROR: i32 = 2; // Bad flags, unreadable input, or ConfigError
pub const SERVICE_ERROR: i32 = 3; // Sandbox failure, timeout, or cancellation

/// Exit code for an engine error; the mapping is owned by the library.
pub fn for_error(err: &JudgeError) -> i32 {
    err.exit_code()
}
