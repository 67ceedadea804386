pub mod types;

pub use types::{FailureRecord, Outcome, PullRef, RunReport};

use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write run output: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to serialize failure report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Emit the run's outputs: the `updated_pulls` value (exactly once), and
/// a one-line terminal summary.
///
/// When GITHUB_OUTPUT is set, `updated_pulls=<value>` is appended to that
/// file per the workflow-output protocol; otherwise it is printed to
/// stdout so the value is still observable when run by hand.
#[instrument(skip(report), fields(updated = report.successes.len(), failed = report.failures.len()))]
pub fn emit(report: &RunReport) -> Result<(), ReportError> {
    let value = report.updated_pulls();

    match std::env::var_os("GITHUB_OUTPUT") {
        Some(path) => {
            debug!(path = %path.to_string_lossy(), "appending updated_pulls to output file");
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            writeln!(file, "updated_pulls={}", value)?;
        }
        None => {
            debug!("no GITHUB_OUTPUT set, printing updated_pulls to stdout");
            println!("updated_pulls={}", value);
        }
    }

    print_summary(report);
    Ok(())
}

/// Format the failure list as the run's terminal failure message:
/// a JSON array of `{ "pull_number": <reference> }` records with
/// 4-space indentation.
pub fn failure_report(failures: &[FailureRecord]) -> Result<String, ReportError> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    failures.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn print_summary(report: &RunReport) {
    println!(
        "{} updated, {} skipped, {} conflicts, {}",
        report.successes.len().to_string().green().bold(),
        report.skipped,
        report.conflicts.to_string().yellow(),
        if report.failures.is_empty() {
            "0 failed".green().to_string()
        } else {
            format!("{} failed", report.failures.len()).red().bold().to_string()
        }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pull(number: u64) -> PullRef {
        PullRef {
            number,
            html_url: format!("https://github.com/acme/widgets/pull/{}", number),
        }
    }

    #[test]
    fn test_failure_report_shape() {
        let failures = vec![FailureRecord {
            pull_number: "https://github.com/acme/widgets/pull/6".to_string(),
        }];
        let json = failure_report(&failures).unwrap();
        assert!(json.contains("\"pull_number\""));
        assert!(json.contains("https://github.com/acme/widgets/pull/6"));
        // 4-space indented, one record per block
        assert!(json.contains("\n    {"));
    }

    #[test]
    fn test_failure_report_empty_list() {
        let json = failure_report(&[]).unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn test_failure_report_round_trips() {
        let failures = vec![
            FailureRecord {
                pull_number: "https://github.com/acme/widgets/pull/6".to_string(),
            },
            FailureRecord {
                pull_number: "https://github.com/acme/widgets/pull/9".to_string(),
            },
        ];
        let json = failure_report(&failures).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(
            parsed[1]["pull_number"],
            "https://github.com/acme/widgets/pull/9"
        );
    }

    #[test]
    fn test_emit_writes_output_file() {
        let dir = std::env::temp_dir();
        let path = dir.join("test_github_output.txt");
        std::fs::remove_file(&path).ok();
        std::env::set_var("GITHUB_OUTPUT", &path);

        let mut report = RunReport::default();
        report.record(Outcome::Updated(pull(42)));
        emit(&report).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("updated_pulls=#42"));

        std::env::remove_var("GITHUB_OUTPUT");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_summary_does_not_panic() {
        let mut report = RunReport::default();
        report.record(Outcome::Failed(pull(6)));
        print_summary(&report);
    }
}
