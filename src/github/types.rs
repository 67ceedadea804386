use serde::Deserialize;

/// An open pull request as observed at enumeration time. Immutable
/// snapshot — updates happen server-side via the update-branch call,
/// never by mutating this struct.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    /// PR number (e.g., 42)
    pub number: u64,
    /// Display reference, used only for reporting
    pub html_url: String,
    /// Labels currently applied to the PR
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Auto-merge annotation; null when auto-merge was never enabled
    #[serde(default)]
    pub auto_merge: Option<AutoMerge>,
    /// The branch this PR targets
    pub base: BaseRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

/// The auto-merge settings on a PR. The API can return the annotation
/// with a null `enabled_by`, which does not count as enabled.
#[derive(Debug, Clone, Deserialize)]
pub struct AutoMerge {
    pub enabled_by: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BaseRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_pull_request() {
        let json = r#"{
            "number": 42,
            "html_url": "https://github.com/acme/widgets/pull/42",
            "labels": [{ "name": "AutoMerge" }],
            "auto_merge": { "enabled_by": { "login": "alice" } },
            "base": { "ref": "main" }
        }"#;
        let pr: PullRequest = serde_json::from_str(json).unwrap();
        assert_eq!(pr.number, 42);
        assert_eq!(pr.labels[0].name, "AutoMerge");
        assert_eq!(
            pr.auto_merge.unwrap().enabled_by.unwrap().login,
            "alice"
        );
        assert_eq!(pr.base.ref_name, "main");
    }

    #[test]
    fn test_deserialize_minimal_pull_request() {
        let json = r#"{
            "number": 7,
            "html_url": "https://github.com/acme/widgets/pull/7",
            "auto_merge": null,
            "base": { "ref": "main" }
        }"#;
        let pr: PullRequest = serde_json::from_str(json).unwrap();
        assert!(pr.labels.is_empty());
        assert!(pr.auto_merge.is_none());
    }

    #[test]
    fn test_deserialize_auto_merge_without_user() {
        let json = r#"{ "enabled_by": null }"#;
        let am: AutoMerge = serde_json::from_str(json).unwrap();
        assert!(am.enabled_by.is_none());
    }
}
