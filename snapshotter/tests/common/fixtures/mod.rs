//! This module provides reusable test utilities:
//! - Mock search cluster (wiremock)
//! - Test configuration builder

// Allow unused code in test fixtures - each test binary uses a subset
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_cluster;
pub mod test_config;

// Re-export commonly used items
pub use mock_cluster::{snapshot_record, MockCluster};
pub use test_config::TestConfigBuilder;
