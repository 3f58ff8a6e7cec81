//! projsync CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration** — flags with environment-variable fallbacks, so
//!    the binary runs unchanged as a GitHub Actions step.
//! 2. **Wire observability** — `tracing-subscriber` (text or JSON on stderr)
//!    plus an optional OpenTelemetry OTLP exporter.
//! 3. **Construct infrastructure** — a [`github::GraphqlProjectApi`] injected
//!    into a [`board::Project`].
//! 4. **Run one sync** — `init` the board, then ensure membership and status
//!    for the single item named on the command line or in the event payload.
//!
//! On success the board-item id is printed on stdout.

mod args;
mod target;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use board::{BoardItemId, DefaultStatusConfig, Project};
use clap::Parser;
use github::GraphqlProjectApi;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use args::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _telemetry = telemetry::init(cli.log_format)?;

    let run_id = Uuid::new_v4();
    let board_item = run(cli)
        .instrument(info_span!("projsync", %run_id))
        .await?;

    println!("{board_item}");
    Ok(())
}

async fn run(cli: Cli) -> Result<BoardItemId> {
    let target = cli
        .target()
        .context("failed to determine which item to synchronize")?;

    let api = GraphqlProjectApi::new(cli.github_config())
        .context("failed to create GitHub client")?;
    let defaults = DefaultStatusConfig::new(cli.issue_status, cli.pull_request_status);
    let mut project = Project::new(Arc::new(api), cli.project_url, defaults);

    let board = project
        .init()
        .await
        .with_context(|| format!("failed to initialize project board {}", project.url()))?;
    info!(
        board = %board.title,
        item = %target.content_id,
        kind = %target.kind,
        "synchronizing item"
    );

    project
        .ensure_membership_and_status(&target.content_id, target.kind)
        .await
        .with_context(|| {
            format!(
                "failed to put {} {} on board \"{}\"",
                target.kind, target.content_id, board.title
            )
        })
}
