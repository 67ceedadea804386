pub mod policy;

pub use policy::{should_run, LabelPolicy};

use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};

use crate::github::{PullRequest, PullsApi};
use crate::report::{Outcome, PullRef, RunReport};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to enumerate open pull requests: {0}")]
    Enumerate(#[source] crate::github::GithubError),
}

/// Everything one run operates on. Built once from the trigger event and
/// read-only thereafter.
pub struct RunContext<'a> {
    pub owner: String,
    pub repo: String,
    pub base_branch: String,
    pub client: &'a dyn PullsApi,
}

/// Process every open pull request targeting the base branch, strictly
/// sequentially, and fold the per-PR outcomes into a RunReport.
///
/// An update failure never aborts the batch; only a failure of the
/// enumeration itself propagates.
pub async fn run(ctx: &RunContext<'_>, policy: &LabelPolicy) -> Result<RunReport, SyncError> {
    info!(
        owner = %ctx.owner,
        repo = %ctx.repo,
        branch = %ctx.base_branch,
        skip = ?policy.skip_labels(),
        activating = ?policy.activating_label(),
        "looking for open PRs eligible for a head branch update"
    );

    let pulls = ctx
        .client
        .list_open_pulls(&ctx.base_branch)
        .await
        .map_err(SyncError::Enumerate)?;

    if pulls.is_empty() {
        info!(branch = %ctx.base_branch, "no open pull requests target this branch");
        return Ok(RunReport::default());
    }

    let mut report = RunReport::default();
    for pr in &pulls {
        let outcome = process_one(ctx, policy, pr)
            .instrument(info_span!("pull", number = pr.number))
            .await;
        report.record(outcome);
    }

    info!(
        updated = report.successes.len(),
        skipped = report.skipped,
        conflicts = report.conflicts,
        failed = report.failures.len(),
        "batch complete"
    );
    Ok(report)
}

/// Classify one pull request into exactly one Outcome. Update errors are
/// caught and classified here; they never escape to the caller.
async fn process_one(ctx: &RunContext<'_>, policy: &LabelPolicy, pr: &PullRequest) -> Outcome {
    if !should_run(pr, policy) {
        info!(pull = pr.number, "skipped by policy");
        return Outcome::Skipped(pr.number);
    }

    match pr.auto_merge.as_ref().and_then(|am| am.enabled_by.as_ref()) {
        Some(user) => {
            info!(pull = pr.number, enabled_by = %user.login, "updating head branch, auto merge enabled")
        }
        None => info!(pull = pr.number, "updating head branch, activating label present"),
    }

    match ctx.client.update_branch(pr.number).await {
        Ok(()) => {
            info!(pull = pr.number, "head branch updated");
            Outcome::Updated(PullRef {
                number: pr.number,
                html_url: pr.html_url.clone(),
            })
        }
        Err(err) if err.is_merge_conflict() => {
            warn!(pull = pr.number, "head branch has merge conflicts, skipping");
            Outcome::ConflictSkipped(pr.number)
        }
        Err(err) => {
            warn!(pull = pr.number, error = %err, "failed to update head branch");
            Outcome::Failed(PullRef {
                number: pr.number,
                html_url: pr.html_url.clone(),
            })
        }
    }
}
