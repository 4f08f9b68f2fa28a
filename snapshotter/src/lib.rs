pub mod config;
pub mod constants;
pub mod errors;
pub mod http;
pub mod naming;
pub mod retry;
pub mod snapshot;

// Re-export commonly used types
pub use config::{CliArgs, Mode, PollTimeoutPolicy, ResolvedConfig};
pub use errors::SnapshotterError;
pub use http::SnapshotClient;
pub use retry::RetryPolicy;
pub use snapshot::{Orchestrator, RunOutcome, RunReport};

/// Resolve configuration from parsed flags and run one lifecycle.
pub async fn run(args: &CliArgs) -> Result<RunReport, SnapshotterError> {
    let config = config::load(args)?;
    let orchestrator = Orchestrator::new(config)?;
    Ok(orchestrator.run().await?)
}
