//! Custom error types for the snapshotter
//!
//! Provides structured error handling with context for the configuration,
//! transport and workflow failure scenarios.

use std::fmt;

/// Main error type for the snapshotter
#[derive(Debug)]
pub enum SnapshotterError {
    /// Configuration-related errors
    Config(ConfigError),

    /// HTTP communication errors with the cluster
    Http(HttpError),

    /// Lifecycle workflow errors
    Workflow(WorkflowError),
}

/// Configuration error variants
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to load configuration file
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },

    /// Missing required configuration
    MissingRequired { field: String },
}

/// HTTP communication error variants
#[derive(Debug, Clone)]
pub enum HttpError {
    /// Every attempt failed; one message per attempt, oldest first
    RequestFailed {
        method: String,
        url: String,
        attempts: Vec<String>,
    },

    /// HTTP client could not be constructed
    ClientBuild { reason: String },
}

/// Lifecycle stage that failed, wrapping the underlying cause
#[derive(Debug)]
pub enum WorkflowError {
    /// Repository provisioning failed
    RepositoryFailed { repository: String, source: HttpError },

    /// Snapshot trigger failed
    SnapshotFailed { snapshot: String, source: HttpError },

    /// Status polling could not reach the cluster
    StatusFailed { snapshot: String, source: HttpError },

    /// Poll budget exhausted without SUCCESS and the policy forbids that
    PollTimedOut {
        snapshot: String,
        attempts: u32,
        last_state: String,
    },

    /// Index wipe failed
    DeleteIndicesFailed { source: HttpError },

    /// Restore trigger failed
    RestoreFailed { snapshot: String, source: HttpError },
}

impl fmt::Display for SnapshotterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotterError::Config(e) => write!(f, "Configuration error: {}", e),
            SnapshotterError::Http(e) => write!(f, "HTTP error: {}", e),
            SnapshotterError::Workflow(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            ConfigError::MissingRequired { field } => {
                write!(f, "--{} is required", field)
            }
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::RequestFailed {
                method,
                url,
                attempts,
            } => {
                writeln!(f, "{} {}:", method, url)?;
                for attempt in attempts {
                    writeln!(f, "\t{}", attempt)?;
                }
                Ok(())
            }
            HttpError::ClientBuild { reason } => {
                write!(f, "Failed to build HTTP client: {}", reason)
            }
        }
    }
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowError::RepositoryFailed { repository, source } => {
                write!(f, "failed to create repository '{}': {}", repository, source)
            }
            WorkflowError::SnapshotFailed { snapshot, source } => {
                write!(f, "failed to create snapshot '{}': {}", snapshot, source)
            }
            WorkflowError::StatusFailed { snapshot, source } => {
                write!(f, "failed to get status of snapshot '{}': {}", snapshot, source)
            }
            WorkflowError::PollTimedOut {
                snapshot,
                attempts,
                last_state,
            } => {
                write!(
                    f,
                    "snapshot '{}' did not reach SUCCESS after {} status checks (last state: {})",
                    snapshot, attempts, last_state
                )
            }
            WorkflowError::DeleteIndicesFailed { source } => {
                write!(f, "failed to delete indices: {}", source)
            }
            WorkflowError::RestoreFailed { snapshot, source } => {
                write!(f, "failed to restore snapshot '{}': {}", snapshot, source)
            }
        }
    }
}

impl std::error::Error for SnapshotterError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for HttpError {}

impl std::error::Error for WorkflowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkflowError::RepositoryFailed { source, .. }
            | WorkflowError::SnapshotFailed { source, .. }
            | WorkflowError::StatusFailed { source, .. }
            | WorkflowError::DeleteIndicesFailed { source }
            | WorkflowError::RestoreFailed { source, .. } => Some(source),
            WorkflowError::PollTimedOut { .. } => None,
        }
    }
}

impl HttpError {
    /// Number of attempts recorded in a request failure
    pub fn attempt_count(&self) -> usize {
        match self {
            HttpError::RequestFailed { attempts, .. } => attempts.len(),
            _ => 0,
        }
    }
}

impl From<ConfigError> for SnapshotterError {
    fn from(err: ConfigError) -> Self {
        SnapshotterError::Config(err)
    }
}

impl From<HttpError> for SnapshotterError {
    fn from(err: HttpError) -> Self {
        SnapshotterError::Http(err)
    }
}

impl From<WorkflowError> for SnapshotterError {
    fn from(err: WorkflowError) -> Self {
        SnapshotterError::Workflow(err)
    }
}
