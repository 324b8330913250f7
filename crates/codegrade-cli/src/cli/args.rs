use clap::{Parser, Subcommand, ValueEnum};
use codegrade_core::{ExecutionConfig, JudgeResult, ProviderKind};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "codegrade",
    version,
    about = "Grade submissions against test cases on a remote execution sandbox"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Grade a submission against a test case file
    Run(RunArgs),
    /// Execute a submission once and print the normalized result as JSON
    Exec(ExecArgs),
    /// List supported languages and their aliases
    Languages(LanguagesArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Execution service settings shared by commands that reach the sandbox.
///
/// Unset flags fall back to the `CODEGRADE_*` environment, read once through
/// [`ExecutionConfig::from_env`].
#[derive(clap::Args, Clone, Debug)]
pub struct ExecutionArgs {
    /// Execution service base URL [env: CODEGRADE_EXECUTION_URL]
    #[arg(long = "url")]
    pub base_url: Option<String>,

    /// Provider protocol: piston or judge0 [env: CODEGRADE_EXECUTION_PROVIDER]
    #[arg(long)]
    pub provider: Option<String>,

    /// Bearer token (piston) or X-Auth-Token (judge0) [env: CODEGRADE_EXECUTION_API_KEY]
    #[arg(long)]
    pub api_key: Option<String>,

    /// Wall-clock budget per execution, in milliseconds [env: CODEGRADE_EXECUTION_TIMEOUT_MS]
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Judge0 CPU time limit, in seconds [env: CODEGRADE_JUDGE0_CPU_TIME_LIMIT]
    #[arg(long)]
    pub cpu_time_limit: Option<f64>,

    /// Judge0 memory limit, in kilobytes [env: CODEGRADE_JUDGE0_MEMORY_LIMIT]
    #[arg(long)]
    pub memory_limit: Option<u64>,
}

impl ExecutionArgs {
    /// Environment config with explicit flags layered on top.
    pub fn to_config(&self) -> JudgeResult<ExecutionConfig> {
        let mut config = ExecutionConfig::from_env()?;

        if let Some(provider) = &self.provider {
            config = config.with_provider(provider.parse::<ProviderKind>()?);
        }
        if let Some(url) = self.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url);
        }
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            config = config.with_api_key(key);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout_ms(timeout_ms);
        }
        if let Some(secs) = self.cpu_time_limit {
            config.cpu_time_limit_secs = secs;
        }
        if let Some(kb) = self.memory_limit {
            config.memory_limit_kb = kb;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Parser, Clone, Debug)]
pub struct RunArgs {
    /// Source file to grade
    #[arg(long)]
    pub code: PathBuf,

    /// Language identifier (e.g. python, js, c++)
    #[arg(long, short = 'l')]
    pub language: String,

    /// Test case file (YAML or JSON)
    #[arg(long)]
    pub cases: PathBuf,

    /// Print input and output of hidden cases
    #[arg(long)]
    pub reveal_hidden: bool,

    /// Output format: text or json
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub execution: ExecutionArgs,
}

#[derive(Parser, Clone, Debug)]
pub struct ExecArgs {
    /// Source file to execute
    #[arg(long)]
    pub code: PathBuf,

    /// Language identifier (e.g. python, js, c++)
    #[arg(long, short = 'l')]
    pub language: String,

    /// Text fed to the program on stdin
    #[arg(long, default_value = "")]
    pub stdin: String,

    #[command(flatten)]
    pub execution: ExecutionArgs,
}

#[derive(Parser, Clone, Debug)]
pub struct LanguagesArgs {
    /// Output format: text or json
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}
