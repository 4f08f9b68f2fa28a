// File: snapshotter/src/snapshot/orchestrator.rs
use std::fmt;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::{Mode, PollTimeoutPolicy, ResolvedConfig};
use crate::errors::{HttpError, WorkflowError};
use crate::http::{SnapshotClient, SnapshotObservation, SnapshotStatusRecord};
use crate::retry::Guarded;

/// Lifecycle states, in the order a run can visit them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Start,
    RepoReady,
    SnapshotTriggered,
    Polling,
    SnapshotDone,
    SnapshotTimedOut,
    IndicesCleared,
    RestoreTriggered,
    RestoreDone,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LifecycleState::Start => "START",
            LifecycleState::RepoReady => "REPO_READY",
            LifecycleState::SnapshotTriggered => "SNAPSHOT_TRIGGERED",
            LifecycleState::Polling => "POLLING",
            LifecycleState::SnapshotDone => "SNAPSHOT_DONE",
            LifecycleState::SnapshotTimedOut => "SNAPSHOT_TIMED_OUT",
            LifecycleState::IndicesCleared => "INDICES_CLEARED",
            LifecycleState::RestoreTriggered => "RESTORE_TRIGGERED",
            LifecycleState::RestoreDone => "RESTORE_DONE",
        };
        f.write_str(label)
    }
}

/// How a successful run ended
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Polling observed SUCCESS
    SnapshotConfirmed {
        record: SnapshotStatusRecord,
        status_checks: u32,
    },
    /// Poll budget spent without SUCCESS; accepted under
    /// [`PollTimeoutPolicy::TreatAsComplete`]
    SnapshotUnconfirmed {
        status_checks: u32,
        last_state: String,
    },
    /// Restore request accepted. Restores are not polled, so completion is
    /// left to external monitoring.
    RestoreAccepted { delete_reissue_skipped: bool },
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub repository: String,
    pub snapshot: String,
    pub outcome: RunOutcome,
    /// Every state the run entered, starting with `START`
    pub states: Vec<LifecycleState>,
}

/// Result of the poll loop before the timeout policy is applied
#[derive(Debug, Clone)]
pub enum PollResult {
    Succeeded {
        record: SnapshotStatusRecord,
        attempts: u32,
    },
    Exhausted {
        attempts: u32,
        last: Option<SnapshotObservation>,
    },
}

struct StateTrail {
    states: Vec<LifecycleState>,
}

impl StateTrail {
    fn new() -> Self {
        Self {
            states: vec![LifecycleState::Start],
        }
    }

    fn enter(&mut self, next: LifecycleState) {
        if let Some(current) = self.states.last() {
            info!("{} -> {}", current, next);
        }
        self.states.push(next);
    }
}

/// Drives one run: provision the repository, then back up or restore.
pub struct Orchestrator {
    config: ResolvedConfig,
    client: SnapshotClient,
}

impl Orchestrator {
    pub fn new(config: ResolvedConfig) -> Result<Self, HttpError> {
        let client = SnapshotClient::new(&config)?;
        Ok(Self { config, client })
    }

    pub async fn run(&self) -> Result<RunReport, WorkflowError> {
        let repository = self.config.repository_name();
        let snapshot = self.config.snapshot_name();
        let mut trail = StateTrail::new();

        info!(
            "Starting {} of {}/{} on {} (max retries {}, interval {:?})",
            match self.config.mode {
                Mode::Backup => "backup",
                Mode::Restore => "restore",
            },
            repository,
            snapshot,
            self.config.url,
            self.config.max_retries,
            self.config.retry_interval
        );

        self.ensure_repository(&repository).await?;
        trail.enter(LifecycleState::RepoReady);

        let outcome = match self.config.mode {
            Mode::Backup => self.backup(&repository, &snapshot, &mut trail).await?,
            Mode::Restore => self.restore(&repository, &snapshot, &mut trail).await?,
        };

        Ok(RunReport {
            repository,
            snapshot,
            outcome,
            states: trail.states,
        })
    }

    async fn ensure_repository(&self, repository: &str) -> Result<(), WorkflowError> {
        self.client
            .ensure_repository(repository, &self.config.repository_spec())
            .await
            .map_err(|source| WorkflowError::RepositoryFailed {
                repository: repository.to_string(),
                source,
            })
    }

    async fn backup(
        &self,
        repository: &str,
        snapshot: &str,
        trail: &mut StateTrail,
    ) -> Result<RunOutcome, WorkflowError> {
        self.client
            .create_snapshot(repository, snapshot, &self.config.snapshot_spec())
            .await
            .map_err(|source| WorkflowError::SnapshotFailed {
                snapshot: snapshot.to_string(),
                source,
            })?;
        trail.enter(LifecycleState::SnapshotTriggered);

        trail.enter(LifecycleState::Polling);
        match self.poll_snapshot(repository, snapshot).await? {
            PollResult::Succeeded { record, attempts } => {
                trail.enter(LifecycleState::SnapshotDone);
                info!(
                    "Snapshot {}/{} succeeded: {}/{} shards, {} failed",
                    repository,
                    snapshot,
                    record.shards.successful,
                    record.shards.total,
                    record.shards.failed
                );
                Ok(RunOutcome::SnapshotConfirmed {
                    record,
                    status_checks: attempts,
                })
            }
            PollResult::Exhausted { attempts, last } => {
                trail.enter(LifecycleState::SnapshotTimedOut);
                let last_state = last
                    .as_ref()
                    .map(|observation| observation.state_label())
                    .unwrap_or_else(|| "<none>".to_string());

                match self.config.poll_timeout_policy {
                    PollTimeoutPolicy::Fail => Err(WorkflowError::PollTimedOut {
                        snapshot: snapshot.to_string(),
                        attempts,
                        last_state,
                    }),
                    PollTimeoutPolicy::TreatAsComplete => {
                        warn!(
                            "Snapshot {}/{} not confirmed after {} status checks, last state {}; finishing anyway",
                            repository, snapshot, attempts, last_state
                        );
                        Ok(RunOutcome::SnapshotUnconfirmed {
                            status_checks: attempts,
                            last_state,
                        })
                    }
                }
            }
        }
    }

    /// Fetch status up to `max_retries + 1` times until a single SUCCESS
    /// record is seen. One iteration is one GET. FAILED, PARTIAL and any
    /// non-200 status (504 included) count as "not yet"; only SUCCESS ends the
    /// loop early. A transport failure ends the run.
    pub async fn poll_snapshot(
        &self,
        repository: &str,
        snapshot: &str,
    ) -> Result<PollResult, WorkflowError> {
        let policy = self.config.retry_policy();
        let max_attempts = policy.max_attempts();
        let mut last = None;

        for attempt in 1..=max_attempts {
            let observation = self
                .client
                .get_snapshot_status(repository, snapshot)
                .await
                .map_err(|source| WorkflowError::StatusFailed {
                    snapshot: snapshot.to_string(),
                    source,
                })?;

            let shards = observation
                .single()
                .map(|record| record.shards.clone())
                .unwrap_or_default();
            info!(
                "Status check {}/{} for {}/{}: status_code = {}, state = {}, shards = {}/{} ({} failed)",
                attempt,
                max_attempts,
                repository,
                snapshot,
                observation.status.as_u16(),
                observation.state_label(),
                shards.successful,
                shards.total,
                shards.failed
            );

            if observation.is_success() {
                if let Some(record) = observation.single() {
                    return Ok(PollResult::Succeeded {
                        record: record.clone(),
                        attempts: attempt,
                    });
                }
            }

            last = Some(observation);
            if attempt < max_attempts {
                sleep(policy.interval()).await;
            }
        }

        Ok(PollResult::Exhausted {
            attempts: max_attempts,
            last,
        })
    }

    async fn restore(
        &self,
        repository: &str,
        snapshot: &str,
        trail: &mut StateTrail,
    ) -> Result<RunOutcome, WorkflowError> {
        warn!(
            "Restore mode: deleting every index on {} before restoring {}/{}",
            self.config.url, repository, snapshot
        );
        let deleted = self
            .client
            .delete_all_indices()
            .await
            .map_err(|source| WorkflowError::DeleteIndicesFailed { source })?;
        trail.enter(LifecycleState::IndicesCleared);

        self.client
            .restore_snapshot(repository, snapshot, &self.config.snapshot_spec())
            .await
            .map_err(|source| WorkflowError::RestoreFailed {
                snapshot: snapshot.to_string(),
                source,
            })?;
        trail.enter(LifecycleState::RestoreTriggered);

        trail.enter(LifecycleState::RestoreDone);
        warn!(
            "Restore of {}/{} accepted; completion is not verified by this run",
            repository, snapshot
        );

        Ok(RunOutcome::RestoreAccepted {
            delete_reissue_skipped: deleted == Guarded::AlreadyInTargetState,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_labels() {
        assert_eq!(LifecycleState::RepoReady.to_string(), "REPO_READY");
        assert_eq!(LifecycleState::SnapshotTimedOut.to_string(), "SNAPSHOT_TIMED_OUT");
        assert_eq!(LifecycleState::RestoreDone.to_string(), "RESTORE_DONE");
    }

    #[test]
    fn test_trail_starts_at_start() {
        let mut trail = StateTrail::new();
        trail.enter(LifecycleState::RepoReady);

        assert_eq!(
            trail.states,
            vec![LifecycleState::Start, LifecycleState::RepoReady]
        );
    }
}
