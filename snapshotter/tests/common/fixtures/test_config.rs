//! Test configuration builder for creating resolved configs programmatically

use chrono::NaiveDate;
use snapshotter::config::StorageSettings;
use snapshotter::{Mode, PollTimeoutPolicy, ResolvedConfig};
use std::time::Duration;

/// Repository name the builder's reference date (2025-01-15) produces
pub const REPOSITORY: &str = "202501";

/// Snapshot name the builder's reference date (2025-01-15) produces
pub const SNAPSHOT: &str = "15";

/// Builder for test configurations pointed at a mock cluster
pub struct TestConfigBuilder {
    config: ResolvedConfig,
}

impl TestConfigBuilder {
    /// Defaults: backup mode, 2 retries, 10ms interval, reference date 2025-01-15
    pub fn new(base_url: &str) -> Self {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid test date");

        Self {
            config: ResolvedConfig {
                service_name: "search".to_string(),
                env: "test".to_string(),
                url: base_url.to_string(),
                indices: "*,-.*".to_string(),
                repository_format: "%Y%m".to_string(),
                snapshot_format: "%d".to_string(),
                date,
                max_retries: 2,
                retry_interval: Duration::from_millis(10),
                retryable_status: 504,
                retry_rejections: true,
                request_timeout: Duration::from_secs(5),
                ignore_unavailable: true,
                include_global_state: true,
                mode: Mode::Backup,
                poll_timeout_policy: PollTimeoutPolicy::TreatAsComplete,
                storage: StorageSettings {
                    bucket: "test-bucket".to_string(),
                    region: "eu-west-1".to_string(),
                    access_key: "AKIATEST".to_string(),
                    secret_key: "test-secret".to_string(),
                    compress: false,
                },
            },
        }
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    pub fn restore(mut self) -> Self {
        self.config.mode = Mode::Restore;
        self
    }

    pub fn fail_on_poll_timeout(mut self) -> Self {
        self.config.poll_timeout_policy = PollTimeoutPolicy::Fail;
        self
    }

    pub fn no_retry_rejections(mut self) -> Self {
        self.config.retry_rejections = false;
        self
    }

    pub fn indices(mut self, indices: &str) -> Self {
        self.config.indices = indices.to_string();
        self
    }

    pub fn include_global_state(mut self, include: bool) -> Self {
        self.config.include_global_state = include;
        self
    }

    pub fn build(self) -> ResolvedConfig {
        self.config
    }
}
