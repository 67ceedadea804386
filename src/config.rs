use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse skip-label list as JSON: {0}")]
    SkipLabels(#[from] serde_json::Error),
}

/// Top-level configuration loaded from .pr-sync.toml.
///
/// All fields are optional — with zero config the tool still runs,
/// authenticating via GITHUB_TOKEN and acting only on auto-merge PRs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// GitHub-specific settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Label policy settings
    #[serde(default)]
    pub labels: LabelConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelConfig {
    /// Labels whose presence disqualifies a pull request from updates
    #[serde(default)]
    pub skip: Vec<String>,

    /// Label that qualifies a pull request regardless of auto-merge state
    pub activating: Option<String>,
}

impl Config {
    /// Load configuration from the given path, or .pr-sync.toml in the
    /// current directory (defaults when neither exists), then apply
    /// environment overrides:
    /// - GITHUB_TOKEN for the API token
    /// - PR_SYNC_SKIP_LABELS, a JSON-encoded list of label names
    /// - PR_SYNC_ACTIVATING_LABEL for the activating label
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let default = Path::new(".pr-sync.toml");
        let config = match path {
            Some(path) => Self::load_from(path)?,
            None if default.exists() => Self::load_from(default)?,
            None => Config::default(),
        };
        Self::apply_env(config)
    }

    /// Load from a specific path (useful for testing and --config).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    fn apply_env(mut config: Config) -> Result<Config, ConfigError> {
        if config.github.token.is_none() {
            if let Ok(token) = std::env::var("GITHUB_TOKEN") {
                config.github.token = Some(token);
            }
        }
        if let Ok(raw) = std::env::var("PR_SYNC_SKIP_LABELS") {
            config.labels.skip = serde_json::from_str(&raw)?;
        }
        if let Ok(label) = std::env::var("PR_SYNC_ACTIVATING_LABEL") {
            config.labels.activating = Some(label);
        }
        Ok(config)
    }

    /// The resolved GitHub token, if any. The GITHUB_TOKEN env fallback
    /// is applied once during load(), not here.
    pub fn github_token(&self) -> Option<String> {
        self.github.token.clone()
    }
}
