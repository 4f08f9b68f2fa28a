// File: snapshotter/src/config/cli.rs
use clap::Parser;
use std::path::PathBuf;

use crate::constants;

/// Command-line flags. Every value is optional here so that the config file
/// and built-in defaults can fill the gaps during resolution.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "snapshotter",
    version,
    about = "Snapshot a search cluster's indices into S3, or restore them",
    long_about = "Ensures a dated S3-backed snapshot repository exists, then either \
                  triggers a snapshot and polls it to completion, or (with --restore) \
                  deletes every index and restores the dated snapshot."
)]
pub struct CliArgs {
    /// Restore mode: delete all indices and restore the dated snapshot
    #[arg(long)]
    pub restore: bool,

    /// Service name, used in the repository base path
    #[arg(long)]
    pub service_name: Option<String>,

    /// Environment name, used in the repository base path
    #[arg(long)]
    pub env: Option<String>,

    /// Cluster URL [default: http://localhost:9200]
    #[arg(long)]
    pub url: Option<String>,

    /// Target index selector [default: *,-.*]
    #[arg(long)]
    pub indices: Option<String>,

    /// strftime template for the repository name [default: %Y%m]
    #[arg(long)]
    pub repository_format: Option<String>,

    /// strftime template for the snapshot name [default: %d]
    #[arg(long)]
    pub snapshot_format: Option<String>,

    /// Pause between attempts, e.g. 30s, 1m, 1m30s [default: 1m]
    #[arg(long)]
    pub retry_interval: Option<String>,

    /// Retries after the first attempt [default: 0]
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// S3 bucket holding the snapshots
    #[arg(long)]
    pub bucket: Option<String>,

    /// S3 region
    #[arg(long, env = constants::env::AWS_REGION)]
    pub region: Option<String>,

    /// S3 access key
    #[arg(long, env = constants::env::AWS_ACCESS_KEY_ID, hide_env_values = true)]
    pub access_key: Option<String>,

    /// S3 secret key
    #[arg(long, env = constants::env::AWS_SECRET_ACCESS_KEY, hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Compress snapshot metadata files [default: false]
    #[arg(long)]
    pub compress: Option<bool>,

    /// Reference date for naming, parsed with --date-format [default: today]
    #[arg(long)]
    pub date: Option<String>,

    /// strftime format used to parse --date [default: %Y%m%d]
    #[arg(long)]
    pub date_format: Option<String>,

    /// Set ignore_unavailable on snapshot and restore [default: true]
    #[arg(long)]
    pub ignore_unavailable: Option<bool>,

    /// Set include_global_state on snapshot and restore [default: true]
    #[arg(long)]
    pub include_global_state: Option<bool>,

    /// Fail the run when polling ends without a SUCCESS state
    #[arg(long)]
    pub fail_on_poll_timeout: bool,

    /// Fail immediately on non-2xx responses other than --retryable-status
    #[arg(long)]
    pub no_retry_rejections: bool,

    /// HTTP status retried alongside transport errors [default: 504]
    #[arg(long)]
    pub retryable_status: Option<u16>,

    /// Timeout for a single HTTP request [default: 60s]
    #[arg(long)]
    pub request_timeout: Option<String>,

    /// Optional TOML file supplying defaults for any of the above
    #[arg(long)]
    pub config: Option<PathBuf>,
}
