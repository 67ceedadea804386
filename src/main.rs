mod config;
mod event;
mod github;
mod report;
mod sync;

use clap::Parser;
use std::path::PathBuf;
use tracing::{info, info_span};
use tracing_subscriber::EnvFilter;

/// pr-sync — after a push to a base branch, updates the head branch of
/// every open pull request targeting it that qualifies under the label
/// and auto-merge policy.
#[derive(Parser, Debug)]
#[command(name = "pr-sync", version, about)]
struct Cli {
    /// Path to the trigger-event JSON payload
    ///
    /// Defaults to $GITHUB_EVENT_PATH, which is set inside workflow runs.
    #[arg(long)]
    event: Option<PathBuf>,

    /// Path to a config file (defaults to .pr-sync.toml in the current directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let event_path = cli
        .event
        .or_else(|| std::env::var_os("GITHUB_EVENT_PATH").map(PathBuf::from))
        .ok_or(event::EventError::MissingPayload)?;
    let trigger = event::TriggerEvent::load_from(&event_path)?;
    let branch = trigger.branch();

    let _main_span =
        info_span!("sync", owner = %trigger.owner, repo = %trigger.repository, branch = %branch)
            .entered();
    info!(
        "operating in {}/{}@{}",
        trigger.owner, trigger.repository, branch
    );

    let config = config::Config::load(cli.config.as_deref())?;
    let token = config
        .github_token()
        .ok_or(github::GithubError::MissingToken)?;

    let policy = sync::LabelPolicy::new(
        &config.labels.skip,
        config.labels.activating.as_deref(),
    );
    let client = github::GithubClient::new(&trigger.owner, &trigger.repository, token);
    let ctx = sync::RunContext {
        owner: trigger.owner.clone(),
        repo: trigger.repository.clone(),
        base_branch: branch,
        client: &client,
    };

    let run_report = sync::run(&ctx, &policy).await?;
    report::emit(&run_report)?;

    if !run_report.failures.is_empty() {
        eprintln!(
            "Failed to update: {}",
            report::failure_report(&run_report.failures)?
        );
        std::process::exit(1);
    }
    Ok(())
}
