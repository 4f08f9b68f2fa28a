// File: snapshotter/src/config/mod.rs
//! Run configuration
//!
//! Configuration comes from three layers, highest precedence first:
//!
//! ```text
//! command-line flag → environment variable → config file (TOML) → built-in default
//! ```
//!
//! [`ResolvedConfig`] is the validated result. It is built once per process and
//! handed by value to the orchestrator, which never re-validates it.

pub mod cli;
pub mod file;
pub mod resolve;

use chrono::NaiveDateTime;
use std::fmt;
use std::time::Duration;

use crate::constants::http::REPOSITORY_TYPE;
use crate::http::types::{RepositorySettings, RepositorySpec, SnapshotSpec};
use crate::naming;
use crate::retry::RetryPolicy;

pub use cli::CliArgs;
pub use file::ConfigFile;
pub use resolve::{load, resolve};

/// Which workflow runs after the repository is provisioned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Backup,
    Restore,
}

/// What to do when snapshot polling runs out of attempts without SUCCESS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTimeoutPolicy {
    /// Log the last observed state and finish the run successfully
    TreatAsComplete,
    /// Fail the run
    Fail,
}

impl PollTimeoutPolicy {
    pub fn from_fail_flag(fail_on_poll_timeout: bool) -> Self {
        if fail_on_poll_timeout {
            PollTimeoutPolicy::Fail
        } else {
            PollTimeoutPolicy::TreatAsComplete
        }
    }
}

/// Object storage settings for the repository
#[derive(Clone, PartialEq)]
pub struct StorageSettings {
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub compress: bool,
}

impl fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageSettings")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("compress", &self.compress)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub service_name: String,
    pub env: String,
    pub url: String,
    pub indices: String,
    pub repository_format: String,
    pub snapshot_format: String,
    /// Reference date the repository and snapshot names are derived from
    pub date: NaiveDateTime,
    pub max_retries: u32,
    pub retry_interval: Duration,
    /// Status code treated as transient in addition to transport failures
    pub retryable_status: u16,
    /// Retry non-2xx responses other than `retryable_status` as well
    pub retry_rejections: bool,
    pub request_timeout: Duration,
    pub ignore_unavailable: bool,
    pub include_global_state: bool,
    pub mode: Mode,
    pub poll_timeout_policy: PollTimeoutPolicy,
    pub storage: StorageSettings,
}

impl ResolvedConfig {
    pub fn repository_name(&self) -> String {
        naming::repository_name(self)
    }

    pub fn snapshot_name(&self) -> String {
        naming::snapshot_name(self)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_interval)
    }

    /// Repository body, with the base path `service/env/repository`
    pub fn repository_spec(&self) -> RepositorySpec {
        RepositorySpec {
            repository_type: REPOSITORY_TYPE.to_string(),
            settings: RepositorySettings {
                bucket: self.storage.bucket.clone(),
                region: self.storage.region.clone(),
                access_key: self.storage.access_key.clone(),
                secret_key: self.storage.secret_key.clone(),
                base_path: naming::base_path(self),
                compress: self.storage.compress,
            },
        }
    }

    /// Body shared by snapshot creation and restore
    pub fn snapshot_spec(&self) -> SnapshotSpec {
        SnapshotSpec {
            indices: self.indices.clone(),
            ignore_unavailable: self.ignore_unavailable,
            include_global_state: self.include_global_state,
        }
    }
}
