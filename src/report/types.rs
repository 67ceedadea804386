use serde::Serialize;

/// Reference to a pull request, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRef {
    pub number: u64,
    pub html_url: String,
}

/// One entry in the run's failure report. The `pull_number` field carries
/// the failing PR's display reference (its URL), matching the output
/// contract consumers of this tool already parse.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FailureRecord {
    pub pull_number: String,
}

/// Terminal state of one pull request within a run. Every enumerated PR
/// ends in exactly one of these.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Head branch was updated
    Updated(PullRef),
    /// Ineligible under the label/auto-merge policy
    Skipped(u64),
    /// Eligible, but the head branch has merge conflicts
    ConflictSkipped(u64),
    /// Eligible, but the update failed for a non-conflict reason
    Failed(PullRef),
}

/// Aggregate result of one run: two append-only sequences plus counters
/// for the summary line. Never persisted beyond the run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// PRs whose head branch was updated, in processing order
    pub successes: Vec<PullRef>,
    /// Non-conflict update failures, in processing order
    pub failures: Vec<FailureRecord>,
    /// PRs skipped by policy
    pub skipped: usize,
    /// Eligible PRs skipped because of merge conflicts
    pub conflicts: usize,
}

impl RunReport {
    /// Fold one outcome into the report.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Updated(pull) => self.successes.push(pull),
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::ConflictSkipped(_) => self.conflicts += 1,
            Outcome::Failed(pull) => self.failures.push(FailureRecord {
                pull_number: pull.html_url,
            }),
        }
    }

    /// The `updated_pulls` output value: comma-joined `#<number>` tokens,
    /// or the literal "None" when nothing was updated.
    pub fn updated_pulls(&self) -> String {
        if self.successes.is_empty() {
            return "None".to_string();
        }
        self.successes
            .iter()
            .map(|p| format!("#{}", p.number))
            .collect::<Vec<_>>()
            .join(",")
    }
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
    fn test_updated_pulls_none_sentinel() {
        let report = RunReport::default();
        assert_eq!(report.updated_pulls(), "None");
    }

    #[test]
    fn test_updated_pulls_joined() {
        let mut report = RunReport::default();
        report.record(Outcome::Updated(pull(5)));
        report.record(Outcome::Updated(pull(42)));
        assert_eq!(report.updated_pulls(), "#5,#42");
    }

    #[test]
    fn test_record_each_outcome_once() {
        let mut report = RunReport::default();
        report.record(Outcome::Updated(pull(1)));
        report.record(Outcome::Skipped(2));
        report.record(Outcome::ConflictSkipped(3));
        report.record(Outcome::Failed(pull(4)));
        assert_eq!(report.successes.len(), 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.conflicts, 1);
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn test_failure_record_carries_own_reference() {
        let mut report = RunReport::default();
        report.record(Outcome::Failed(pull(6)));
        assert_eq!(
            report.failures[0].pull_number,
            "https://github.com/acme/widgets/pull/6"
        );
    }

    #[test]
    fn test_conflict_is_not_a_failure() {
        let mut report = RunReport::default();
        report.record(Outcome::ConflictSkipped(7));
        assert!(report.failures.is_empty());
        assert_eq!(report.updated_pulls(), "None");
    }
}
