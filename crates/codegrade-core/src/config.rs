//! Execution configuration.
//!
//! Built once by the host (from env, a config file, or code) and passed
//! into the executor. Nothing in the engine reads the environment at call time.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{JudgeError, JudgeResult, STATUS_UNAVAILABLE};

/// Which remote judge protocol to speak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Synchronous execute endpoint (piston-style).
    #[default]
    Piston,
    /// Queued submissions endpoint with `wait=true` (judge0-style).
    Judge0,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Piston => "piston",
            Self::Judge0 => "judge0",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = JudgeError;

    fn from_str(s: &str) -> JudgeResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "piston" | "a" => Ok(Self::Piston),
            "judge0" | "b" => Ok(Self::Judge0),
            other => Err(JudgeError::config(
                STATUS_UNAVAILABLE,
                format!("unknown execution provider: {other}"),
            )),
        }
    }
}

/// Execution configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Base URL of the execution service. Required.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Provider protocol.
    #[serde(default)]
    pub provider: ProviderKind,

    /// Bearer token (piston) or `X-Auth-Token` (judge0).
    #[serde(default)]
    pub api_key: Option<String>,

    /// Wall-clock budget for one provider call, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Judge0 `cpu_time_limit`, in seconds.
    #[serde(default = "default_cpu_time_limit")]
    pub cpu_time_limit_secs: f64,

    /// Judge0 `memory_limit`, in kilobytes.
    #[serde(default = "default_memory_limit")]
    pub memory_limit_kb: u64,
}

fn default_timeout_ms() -> u64 {
    8000
}

fn default_cpu_time_limit() -> f64 {
    2.0
}

fn default_memory_limit() -> u64 {
    128_000
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            provider: ProviderKind::default(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
            cpu_time_limit_secs: default_cpu_time_limit(),
            memory_limit_kb: default_memory_limit(),
        }
    }
}

impl ExecutionConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `CODEGRADE_EXECUTION_URL` | Execution service base URL |
    /// | `CODEGRADE_EXECUTION_PROVIDER` | `piston` (default) or `judge0` |
    /// | `CODEGRADE_EXECUTION_API_KEY` | Credential |
    /// | `CODEGRADE_EXECUTION_TIMEOUT_MS` | Per-call budget (default 8000) |
    /// | `CODEGRADE_JUDGE0_CPU_TIME_LIMIT` | Judge0 CPU seconds (default 2) |
    /// | `CODEGRADE_JUDGE0_MEMORY_LIMIT` | Judge0 memory KB (default 128000) |
    pub fn from_env() -> JudgeResult<Self> {
        let provider = match non_empty_var("CODEGRADE_EXECUTION_PROVIDER") {
            Some(v) => v.parse()?,
            None => ProviderKind::default(),
        };

        let config = Self {
            base_url: non_empty_var("CODEGRADE_EXECUTION_URL"),
            provider,
            api_key: non_empty_var("CODEGRADE_EXECUTION_API_KEY"),
            timeout_ms: parse_var("CODEGRADE_EXECUTION_TIMEOUT_MS")?
                .unwrap_or_else(default_timeout_ms),
            cpu_time_limit_secs: parse_var("CODEGRADE_JUDGE0_CPU_TIME_LIMIT")?
                .unwrap_or_else(default_cpu_time_limit),
            memory_limit_kb: parse_var("CODEGRADE_JUDGE0_MEMORY_LIMIT")?
                .unwrap_or_else(default_memory_limit),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reject settings under which every call would fail (a zero timeout).
    pub fn validate(&self) -> JudgeResult<()> {
        if self.timeout_ms == 0 {
            return Err(JudgeError::config(
                STATUS_UNAVAILABLE,
                "execution timeout must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Base URL without trailing slash; `ConfigError` when unset or blank.
    pub fn require_base_url(&self) -> JudgeResult<&str> {
        self.base_url
            .as_deref()
            .map(|u| u.trim().trim_end_matches('/'))
            .filter(|u| !u.is_empty())
            .ok_or_else(JudgeError::missing_base_url)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(key: &str) -> JudgeResult<Option<T>> {
    match non_empty_var(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            JudgeError::config(STATUS_UNAVAILABLE, format!("invalid value for {key}: {raw}"))
        }),
    }
}
