//! Central repository for defaults and fixed protocol values
//!
//! Organized by category so the CLI layer, the config file loader and the
//! tests agree on a single source of truth.

use std::time::Duration;

/// HTTP client constants
pub mod http {
    use super::Duration;

    /// Default timeout for a single request to the cluster
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Status treated as transient by default (504)
    pub const RETRYABLE_STATUS: u16 = 504;

    /// Storage backend type tag for repositories
    pub const REPOSITORY_TYPE: &str = "s3";

    /// Index selector used when wiping the cluster before a restore
    pub const ALL_INDICES: &str = "*";
}

/// Default configuration values
pub mod defaults {
    /// Default cluster URL
    pub const URL: &str = "http://localhost:9200";

    /// Default index selector: everything except hidden/system indices
    pub const INDICES: &str = "*,-.*";

    /// Default repository name template (one repository per month)
    pub const REPOSITORY_FORMAT: &str = "%Y%m";

    /// Default snapshot name template (one snapshot per day)
    pub const SNAPSHOT_FORMAT: &str = "%d";

    /// Default format for parsing `--date`
    pub const DATE_FORMAT: &str = "%Y%m%d";

    /// Default pause between attempts
    pub const RETRY_INTERVAL: &str = "1m";

    /// Default retry count (initial attempt only)
    pub const MAX_RETRIES: u32 = 0;

    pub const IGNORE_UNAVAILABLE: bool = true;
    pub const INCLUDE_GLOBAL_STATE: bool = true;
    pub const COMPRESS: bool = false;
}

/// Environment variables consulted when flags are omitted
pub mod env {
    pub const AWS_REGION: &str = "AWS_REGION";
    pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
    pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
}
