// File: snapshotter/src/http/types.rs
//! Wire types for the snapshot API

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `PUT /_snapshot/{repository}` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySpec {
    #[serde(rename = "type")]
    pub repository_type: String,
    pub settings: RepositorySettings,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySettings {
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub base_path: String,
    pub compress: bool,
}

impl fmt::Debug for RepositorySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositorySettings")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("base_path", &self.base_path)
            .field("compress", &self.compress)
            .finish()
    }
}

/// Body for snapshot creation and restore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSpec {
    pub indices: String,
    pub ignore_unavailable: bool,
    pub include_global_state: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotState {
    InProgress,
    Success,
    Partial,
    Failed,
    Incompatible,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for SnapshotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SnapshotState::InProgress => "IN_PROGRESS",
            SnapshotState::Success => "SUCCESS",
            SnapshotState::Partial => "PARTIAL",
            SnapshotState::Failed => "FAILED",
            SnapshotState::Incompatible => "INCOMPATIBLE",
            SnapshotState::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardStats {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub successful: u32,
}

/// One entry of `GET /_snapshot/{repository}/{snapshot}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotStatusRecord {
    pub snapshot: String,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub version_id: Option<i64>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub indices: Vec<String>,
    pub state: SnapshotState,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub start_time_in_millis: Option<i64>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub end_time_in_millis: Option<i64>,
    #[serde(default)]
    pub duration_in_millis: Option<i64>,
    /// Shape varies across cluster versions, kept as raw JSON
    #[serde(default)]
    pub failures: Vec<serde_json::Value>,
    #[serde(default)]
    pub shards: ShardStats,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotList {
    #[serde(default)]
    pub snapshots: Vec<SnapshotStatusRecord>,
}

/// What a single status fetch saw. Non-200 responses are observations too;
/// the poll loop decides what they mean.
#[derive(Debug, Clone)]
pub struct SnapshotObservation {
    pub status: StatusCode,
    pub snapshots: Vec<SnapshotStatusRecord>,
    pub body: String,
}

impl SnapshotObservation {
    /// The record, when exactly one was returned
    pub fn single(&self) -> Option<&SnapshotStatusRecord> {
        match self.snapshots.as_slice() {
            [record] => Some(record),
            _ => None,
        }
    }

    /// 200, exactly one record, state SUCCESS
    pub fn is_success(&self) -> bool {
        self.status == StatusCode::OK
            && self
                .single()
                .is_some_and(|record| record.state == SnapshotState::Success)
    }

    pub fn state_label(&self) -> String {
        match self.single() {
            Some(record) => record.state.to_string(),
            None => format!("<{} records>", self.snapshots.len()),
        }
    }
}

/// One row of `GET /_cat/indices?format=json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndexSummary {
    pub index: String,
}
