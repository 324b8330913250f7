//! CLI command: codegrade run
//!
//! Grade a submission against a test case file.
//!
//! Usage:
//!   codegrade run --code main.py --language python --cases cases.yaml [--format text|json]
//!
//! The cases file is either a list of `{input, output, isHidden}` entries or
//! a document with a `testCases` list. Hidden cases are redacted unless
//! `--reveal-hidden` is passed.

use anyhow::{Context, Result};
use codegrade_core::{BatchVerdict, Harness, JudgeResult, TestCase};
use serde::Deserialize;
use std::path::Path;

use super::super::args::{OutputFormat, RunArgs};
use crate::exit_codes;

#[derive(Deserialize)]
#[serde(untagged)]
enum CaseFile {
    List(Vec<TestCase>),
    Document {
        #[serde(rename = "testCases", alias = "test_cases", alias = "cases")]
        test_cases: Vec<TestCase>,
    },
}

pub(crate) fn load_cases(path: &Path) -> Result<Vec<TestCase>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test cases {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let file: CaseFile = if is_json {
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid JSON test cases in {}", path.display()))?
    } else {
        serde_yaml::from_str(&raw)
            .with_context(|| format!("invalid YAML test cases in {}", path.display()))?
    };

    Ok(match file {
        CaseFile::List(cases) => cases,
        CaseFile::Document { test_cases } => test_cases,
    })
}

/// Blank out everything a hidden case would leak; keep pass/fail and timing.
pub(crate) fn redact_hidden(verdict: &mut BatchVerdict) {
    for result in verdict.results.iter_mut().filter(|r| r.is_hidden) {
        result.input.clear();
        result.expected_output.clear();
        result.stdout.clear();
        result.stderr.clear();
    }
}

pub async fn run(args: RunArgs) -> Result<i32> {
    let code = super::read_source(&args.code)?;
    let cases = load_cases(&args.cases)?;

    let mut verdict = match grade(&args, &code, &cases).await {
        Ok(verdict) => verdict,
        Err(err) => return Ok(super::report(&err)),
    };

    if !args.reveal_hidden {
        redact_hidden(&mut verdict);
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&verdict)?),
        OutputFormat::Text => print_text(&verdict, args.reveal_hidden),
    }

    Ok(if verdict.all_passed() {
        exit_codes::SUCCESS
    } else {
        exit_codes::TESTS_FAILED
    })
}

async fn grade(args: &RunArgs, code: &str, cases: &[TestCase]) -> JudgeResult<BatchVerdict> {
    let config = args.execution.to_config()?;
    let harness = Harness::from_config(&config)?;
    let cancel = super::cancel_on_ctrl_c();
    harness
        .run_test_cases_with_cancel(code, &args.language, cases, &cancel)
        .await
}

fn print_text(verdict: &BatchVerdict, reveal_hidden: bool) {
    for result in &verdict.results {
        let status = if result.passed { "PASS" } else { "FAIL" };
        let hidden = if result.is_hidden { "  (hidden)" } else { "" };
        println!(
            "#{:<3} {status}  {:>5} ms  exit {}{hidden}",
            result.index, result.time_ms, result.exit_code
        );

        if result.passed || (result.is_hidden && !reveal_hidden) {
            continue;
        }
        println!("     input:    {}", result.input.trim_end());
        println!("     expected: {}", result.expected_output.trim());
        println!("     actual:   {}", result.stdout.trim());
        if !result.stderr.trim().is_empty() {
            println!("     stderr:   {}", result.stderr.trim());
        }
    }
    println!("passed {}/{}", verdict.passed_count, verdict.total_tests);
}
