use tracing::debug;

use crate::github::PullRequest;

/// Label policy for one run: blocking labels disqualify a PR outright,
/// the optional activating label qualifies it independently of its
/// auto-merge state. Names are compared case-insensitively.
#[derive(Debug, Clone)]
pub struct LabelPolicy {
    skip: Vec<String>,
    activating: Option<String>,
}

impl LabelPolicy {
    /// Build a policy from operator configuration. An activating label
    /// that is configured but blank means the same as none at all:
    /// label activation is disabled (it must never match anything), and
    /// auto-merge remains the way a PR qualifies.
    pub fn new(skip: &[String], activating: Option<&str>) -> LabelPolicy {
        let activating = activating
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_lowercase);
        LabelPolicy {
            skip: skip.iter().map(|l| l.to_lowercase()).collect(),
            activating,
        }
    }

    pub fn skip_labels(&self) -> &[String] {
        &self.skip
    }

    pub fn activating_label(&self) -> Option<&str> {
        self.activating.as_deref()
    }
}

/// Decide whether a pull request qualifies for a head-branch update.
///
/// A blocking label wins over every other signal. Otherwise the PR
/// qualifies if it carries the activating label or has auto-merge
/// enabled by a user. Pure aside from diagnostics.
pub fn should_run(pr: &PullRequest, policy: &LabelPolicy) -> bool {
    for label in &pr.labels {
        let name = label.name.to_lowercase();
        if policy.skip.contains(&name) {
            debug!(pull = pr.number, label = %name, "blocking label present, disqualified");
            return false;
        }
    }

    let has_activating = match policy.activating.as_deref() {
        Some(activating) => pr
            .labels
            .iter()
            .any(|l| l.name.to_lowercase() == activating),
        None => false,
    };

    let auto_merge_enabled = pr
        .auto_merge
        .as_ref()
        .and_then(|am| am.enabled_by.as_ref())
        .is_some();

    let eligible = has_activating || auto_merge_enabled;
    debug!(
        pull = pr.number,
        has_activating, auto_merge_enabled, eligible, "eligibility decision"
    );
    eligible
}
