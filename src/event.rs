use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("No event payload: pass --event or set GITHUB_EVENT_PATH")]
    MissingPayload,

    #[error("Failed to read event payload: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse event payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Event payload has no repository owner")]
    MissingOwner,
}

/// Metadata extracted from the push-event payload that triggered the run.
#[derive(Debug, Clone)]
pub struct TriggerEvent {
    pub owner: String,
    pub repository: String,
    pub git_ref: String,
}

#[derive(Deserialize)]
struct Payload {
    #[serde(rename = "ref")]
    git_ref: String,
    repository: Repository,
}

#[derive(Deserialize)]
struct Repository {
    name: String,
    owner: Owner,
}

/// Push payloads carry the owner's `name`, other event shapes only `login`.
#[derive(Deserialize)]
struct Owner {
    name: Option<String>,
    login: Option<String>,
}

impl TriggerEvent {
    /// Load the trigger event from a payload file on disk.
    pub fn load_from(path: &Path) -> Result<TriggerEvent, EventError> {
        let contents = std::fs::read_to_string(path)?;
        let payload: Payload = serde_json::from_str(&contents)?;
        let owner = payload
            .repository
            .owner
            .name
            .or(payload.repository.owner.login)
            .ok_or(EventError::MissingOwner)?;

        debug!(owner = %owner, repo = %payload.repository.name, git_ref = %payload.git_ref, "loaded trigger event");
        Ok(TriggerEvent {
            owner,
            repository: payload.repository.name,
            git_ref: payload.git_ref,
        })
    }

    /// The branch the push landed on.
    pub fn branch(&self) -> String {
        branch_from_ref(&self.git_ref)
    }
}

/// Derive a branch name from a fully qualified ref by dropping the first
/// two path segments: "refs/heads/release/1.0" -> "release/1.0".
pub fn branch_from_ref(git_ref: &str) -> String {
    git_ref.splitn(3, '/').nth(2).unwrap_or_default().to_string()
}
