//! Runtime registry: the closed set of supported languages and the
//! parameters each execution provider needs for them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{JudgeError, JudgeResult};

/// Supported submission language.
///
/// Serializes as its canonical name; deserializes through [`FromStr`], so
/// aliases and mixed case are accepted wherever a language is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Cpp,
    C,
    Go,
    Rust,
}

/// Per-provider runtime parameters for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub language: Language,
    /// Language name on the synchronous (piston-style) provider.
    pub piston_language: &'static str,
    /// Interpreter/compiler version on the synchronous provider.
    pub piston_version: &'static str,
    /// Numeric language id on the queued (judge0-style) provider.
    pub judge0_id: u32,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Java,
        Language::Cpp,
        Language::C,
        Language::Go,
        Language::Rust,
    ];

    /// Canonical identifier.
    pub fn name(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::Go => "go",
            Self::Rust => "rust",
        }
    }

    /// Accepted alternate spellings (lowercase).
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Python => &["py", "python3"],
            Self::JavaScript => &["js", "node", "nodejs"],
            Self::TypeScript => &["ts"],
            Self::Java => &[],
            Self::Cpp => &["c++", "cxx"],
            Self::C => &[],
            Self::Go => &["golang"],
            Self::Rust => &["rs"],
        }
    }

    pub fn runtime(self) -> RuntimeConfig {
        let (piston_language, piston_version, judge0_id) = match self {
            Self::Python => ("python", "3.10.0", 71),
            Self::JavaScript => ("javascript", "18.15.0", 63),
            Self::TypeScript => ("typescript", "5.0.3", 74),
            Self::Java => ("java", "15.0.2", 62),
            Self::Cpp => ("c++", "10.2.0", 54),
            Self::C => ("c", "10.2.0", 50),
            Self::Go => ("go", "1.16.2", 60),
            Self::Rust => ("rust", "1.68.2", 73),
        };
        RuntimeConfig {
            language: self,
            piston_language,
            piston_version,
            judge0_id,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = JudgeError;

    fn from_str(s: &str) -> JudgeResult<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.name() == needle || lang.aliases().iter().any(|a| *a == needle))
            .ok_or_else(|| JudgeError::unsupported_language(s))
    }
}

impl TryFrom<String> for Language {
    type Error = JudgeError;

    fn try_from(value: String) -> JudgeResult<Self> {
        value.parse()
    }
}

impl From<Language> for &'static str {
    fn from(lang: Language) -> Self {
        lang.name()
    }
}

/// Resolve a language identifier (case-insensitive) to its runtime config.
pub fn resolve(language_id: &str) -> JudgeResult<RuntimeConfig> {
    language_id.parse::<Language>().map(Language::runtime)
}
