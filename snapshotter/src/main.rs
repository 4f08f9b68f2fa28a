// File: snapshotter/src/main.rs
use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use snapshotter::{CliArgs, RunOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("snapshotter=info".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    let args = CliArgs::parse();

    let report = match snapshotter::run(&args).await {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    match &report.outcome {
        RunOutcome::SnapshotConfirmed { status_checks, .. } => info!(
            "Snapshot {}/{} confirmed after {} status checks",
            report.repository, report.snapshot, status_checks
        ),
        RunOutcome::SnapshotUnconfirmed {
            status_checks,
            last_state,
        } => warn!(
            "Snapshot {}/{} unconfirmed after {} status checks (last state {})",
            report.repository, report.snapshot, status_checks, last_state
        ),
        RunOutcome::RestoreAccepted { .. } => info!(
            "Restore of {}/{} triggered",
            report.repository, report.snapshot
        ),
    }

    info!("complete");
    Ok(())
}
