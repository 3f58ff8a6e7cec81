//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use github::GithubConfig;

use crate::target::{ItemTarget, TargetError};

/// Log output format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "projsync",
    version,
    about = "Put an issue or pull request on a GitHub project board with its default status",
    long_about = None,
)]
pub struct Cli {
    /// Token used for the GitHub GraphQL API.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Board URL, e.g. https://github.com/orgs/acme/projects/7
    #[arg(long, env = "PROJECT_URL")]
    pub project_url: String,

    /// Status given to issues (case-insensitive substring of a Status option).
    #[arg(long, env = "ISSUE_STATUS", value_parser = status_label)]
    pub issue_status: String,

    /// Status given to pull requests (case-insensitive substring of a Status option).
    #[arg(long, env = "PULL_REQUEST_STATUS", value_parser = status_label)]
    pub pull_request_status: String,

    /// Node id of the issue or pull request. Takes precedence over --event-path.
    #[arg(long, env = "ITEM_ID")]
    pub item_id: Option<String>,

    /// Treat --item-id as a pull request.
    #[arg(long)]
    pub pull_request: bool,

    /// Webhook payload to take the item from.
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// GraphQL endpoint (GitHub Enterprise Server).
    #[arg(long, env = "GITHUB_GRAPHQL_URL")]
    pub graphql_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "PROJSYNC_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    #[arg(long, value_enum, env = "PROJSYNC_LOG_FORMAT", default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// A blank label is a substring of every option name, so it would silently
/// select the first one.
fn status_label(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("status label must not be empty".to_string());
    }
    Ok(value.to_string())
}

impl Cli {
    /// The item this run synchronizes.
    pub fn target(&self) -> Result<ItemTarget, TargetError> {
        match (&self.item_id, &self.event_path) {
            (Some(id), _) => ItemTarget::from_item_id(id, self.pull_request),
            (None, Some(path)) => ItemTarget::from_event_file(path),
            (None, None) => Err(TargetError::NotSpecified),
        }
    }

    pub fn github_config(&self) -> GithubConfig {
        GithubConfig {
            token: self.token.clone(),
            graphql_url: self.graphql_url.clone(),
            timeout_secs: self.timeout_secs,
            user_agent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use board::ItemKind;
    use clap::CommandFactory;

    use super::*;

    const REQUIRED: [&str; 9] = [
        "projsync",
        "--token",
        "t",
        "--project-url",
        "https://github.com/orgs/acme/projects/7",
        "--issue-status",
        "Todo",
        "--pull-request-status",
        "In Review",
    ];

    fn parse(extra: &[&str]) -> Cli {
        Cli::try_parse_from(REQUIRED.iter().chain(extra)).unwrap()
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn explicit_item_wins_over_event_path() {
        let cli = parse(&["--item-id", "PR_1", "--pull-request", "--event-path", "/nope.json"]);
        let target = cli.target().unwrap();
        assert_eq!(target.content_id.as_str(), "PR_1");
        assert_eq!(target.kind, ItemKind::PullRequest);
    }

    #[test]
    fn github_config_carries_overrides() {
        let cli = parse(&[
            "--graphql-url",
            "https://ghe.local/api/graphql",
            "--timeout-secs",
            "5",
        ]);
        let config = cli.github_config();
        assert_eq!(config.graphql_url(), "https://ghe.local/api/graphql");
        assert_eq!(config.timeout_secs(), 5);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn log_format_accepts_json() {
        let cli = parse(&["--log-format", "json"]);
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    fn with_statuses(issue: &str, pull_request: &str) -> Vec<String> {
        let mut args: Vec<String> = REQUIRED[..5].iter().map(|a| a.to_string()).collect();
        let statuses = ["--issue-status", issue, "--pull-request-status", pull_request];
        args.extend(statuses.map(String::from));
        args
    }

    #[test]
    fn blank_status_labels_are_rejected() {
        for label in ["", "   "] {
            for args in [with_statuses(label, "In Review"), with_statuses("Todo", label)] {
                let err = Cli::try_parse_from(&args).unwrap_err();
                assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation, "{args:?}");
            }
        }
    }

    #[test]
    fn status_labels_keep_their_spelling() {
        let cli = Cli::try_parse_from(with_statuses(" Backlog", "In Review")).unwrap();
        assert_eq!(cli.issue_status, " Backlog");
        assert_eq!(cli.pull_request_status, "In Review");
    }
}
