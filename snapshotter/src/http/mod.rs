// File: snapshotter/src/http/mod.rs
//! HTTP communication with the search cluster's snapshot API
//!
//! # Endpoints
//!
//! ```text
//! PUT    /_snapshot/{repository}                        ensure repository
//! PUT    /_snapshot/{repository}/{snapshot}             create snapshot
//! GET    /_snapshot/{repository}/{snapshot}             snapshot status
//! DELETE /*                                             delete all indices
//! POST   /_snapshot/{repository}/{snapshot}/_restore    restore snapshot
//! GET    /_cat/indices/*?format=json                    index listing (delete pre-check)
//! ```
//!
//! # Failure Handling
//!
//! - Each call except the status fetch is retried per the run's retry policy;
//!   the status fetch is one request, budgeted by the poll loop
//! - A failure reports the method, the URL and every attempt's error
//! - No partial-success semantics: the caller treats any error as fatal

pub mod client;
pub mod types;

pub use client::{AttemptError, SnapshotClient};
pub use types::{
    IndexSummary, RepositorySettings, RepositorySpec, ShardStats, SnapshotList,
    SnapshotObservation, SnapshotSpec, SnapshotState, SnapshotStatusRecord,
};
