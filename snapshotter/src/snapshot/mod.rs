// File: snapshotter/src/snapshot/mod.rs

//! Snapshot lifecycle orchestration
//!
//! One run provisions the dated repository and then performs exactly one
//! workflow, strictly in sequence.
//!
//! # Backup
//!
//! 1. Ensure the S3 repository exists (`START → REPO_READY`)
//! 2. Trigger the snapshot (`SNAPSHOT_TRIGGERED`)
//! 3. Poll until a single record reports `SUCCESS` or the budget runs out
//!    (`POLLING → SNAPSHOT_DONE | SNAPSHOT_TIMED_OUT`)
//!
//! # Restore
//!
//! 1. Ensure the S3 repository exists
//! 2. **Delete every index** (`INDICES_CLEARED`)
//! 3. Trigger the restore (`RESTORE_TRIGGERED → RESTORE_DONE`)
//!
//! Restores are not polled: the run ends once the cluster accepts the request.
//!
//! Any failure at a trigger step aborts the run. Nothing is rolled back.

pub mod orchestrator;

pub use orchestrator::{LifecycleState, Orchestrator, PollResult, RunOutcome, RunReport};
