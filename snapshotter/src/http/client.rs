// File: snapshotter/src/http/client.rs
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;
use tracing::{debug, info, warn};

use super::types::{
    IndexSummary, RepositorySpec, SnapshotList, SnapshotObservation, SnapshotSpec,
};
use crate::config::ResolvedConfig;
use crate::constants::http::ALL_INDICES;
use crate::errors::HttpError;
use crate::retry::{Guarded, RetryFailure, RetryPolicy};

/// Why a single request attempt failed
#[derive(Debug, Clone)]
pub enum AttemptError {
    /// Connection, DNS, TLS or timeout failure
    Transport(String),
    /// Non-2xx response
    Status { status: StatusCode, body: String },
    /// Body could not be decoded
    Decode(String),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Transport(reason) => write!(f, "{}", reason),
            AttemptError::Status { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    write!(f, "status {}", status)
                } else {
                    write!(f, "status {}: {}", status, truncate(body, 512))
                }
            }
            AttemptError::Decode(reason) => write!(f, "invalid response body: {}", reason),
        }
    }
}

/// Client for the cluster's snapshot API. Every call except the status fetch
/// goes through the run's [`RetryPolicy`]; status polling is budgeted by the
/// poll loop.
pub struct SnapshotClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
    retryable_status: StatusCode,
    retry_rejections: bool,
}

impl SnapshotClient {
    pub fn new(config: &ResolvedConfig) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| HttpError::ClientBuild {
                reason: e.to_string(),
            })?;

        let retryable_status =
            StatusCode::from_u16(config.retryable_status).map_err(|e| HttpError::ClientBuild {
                reason: format!("retryable status {}: {}", config.retryable_status, e),
            })?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            retry: config.retry_policy(),
            retryable_status,
            retry_rejections: config.retry_rejections,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Transport failures and the designated status are always retried;
    /// other rejections only when the run allows it.
    fn is_retryable(&self, err: &AttemptError) -> bool {
        match err {
            AttemptError::Transport(_) | AttemptError::Decode(_) => true,
            AttemptError::Status { status, .. } if *status == self.retryable_status => true,
            AttemptError::Status { .. } => self.retry_rejections,
        }
    }

    // === Snapshot API ===

    /// `PUT /_snapshot/{repository}`; creates or updates in place
    pub async fn ensure_repository(
        &self,
        repository: &str,
        spec: &RepositorySpec,
    ) -> Result<(), HttpError> {
        let path = format!("/_snapshot/{}", repository);
        self.execute(Method::PUT, &path, Some(spec)).await?;
        info!(
            "Repository {} ready (base_path {})",
            repository, spec.settings.base_path
        );
        Ok(())
    }

    /// `PUT /_snapshot/{repository}/{snapshot}`; an existing snapshot is
    /// reported by the cluster, not special-cased here
    pub async fn create_snapshot(
        &self,
        repository: &str,
        snapshot: &str,
        spec: &SnapshotSpec,
    ) -> Result<(), HttpError> {
        let path = format!("/_snapshot/{}/{}", repository, snapshot);
        self.execute(Method::PUT, &path, Some(spec)).await?;
        info!("Snapshot {}/{} triggered for indices {}", repository, snapshot, spec.indices);
        Ok(())
    }

    /// `GET /_snapshot/{repository}/{snapshot}`, exactly one request.
    ///
    /// Any HTTP status, the retryable one included, is returned as an
    /// observation for the poll loop to judge; the poll loop owns the attempt
    /// budget. Only a transport failure is an error.
    pub async fn get_snapshot_status(
        &self,
        repository: &str,
        snapshot: &str,
    ) -> Result<SnapshotObservation, HttpError> {
        let url = self.url(&format!("/_snapshot/{}/{}", repository, snapshot));

        self.observe_snapshot(&url)
            .await
            .map_err(|e| HttpError::RequestFailed {
                method: Method::GET.to_string(),
                url: url.clone(),
                attempts: vec![e.to_string()],
            })
    }

    /// `DELETE /*`
    ///
    /// Retries are guarded: before re-issuing the delete, the index listing
    /// is checked and an already empty cluster ends the loop.
    pub async fn delete_all_indices(&self) -> Result<Guarded<()>, HttpError> {
        let url = self.url(&format!("/{}", ALL_INDICES));
        let label = format!("DELETE {}", url);

        let outcome = self
            .retry
            .run_guarded(
                &label,
                |e| self.is_retryable(e),
                || self.delete_once(&url),
                || self.indices_cleared(),
            )
            .await
            .map_err(|failure| request_failed(Method::DELETE, &url, failure))?;

        match outcome {
            Guarded::Completed(()) => info!("All indices deleted"),
            Guarded::AlreadyInTargetState => {
                info!("Index listing is empty; delete not re-issued")
            }
        }
        Ok(outcome)
    }

    /// `POST /_snapshot/{repository}/{snapshot}/_restore`
    pub async fn restore_snapshot(
        &self,
        repository: &str,
        snapshot: &str,
        spec: &SnapshotSpec,
    ) -> Result<(), HttpError> {
        let path = format!("/_snapshot/{}/{}/_restore", repository, snapshot);
        self.execute(Method::POST, &path, Some(spec)).await?;
        info!("Restore of {}/{} accepted", repository, snapshot);
        Ok(())
    }

    /// `GET /_cat/indices/*?format=json`, single attempt. Uses the same
    /// wildcard expansion as the delete.
    pub async fn list_indices(&self) -> Result<Vec<IndexSummary>, AttemptError> {
        let url = self.url(&format!(
            "/_cat/indices/{}?format=json&expand_wildcards=open,closed",
            ALL_INDICES
        ));
        let body = self.attempt(Method::GET, &url, None::<&()>).await?;
        serde_json::from_str(&body).map_err(|e| AttemptError::Decode(e.to_string()))
    }

    // === Single attempts ===

    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String, HttpError> {
        let url = self.url(path);
        let label = format!("{} {}", method, url);

        self.retry
            .run(
                &label,
                |e| self.is_retryable(e),
                || self.attempt(method.clone(), &url, body),
            )
            .await
            .map_err(|failure| request_failed(method.clone(), &url, failure))
    }

    async fn attempt<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<String, AttemptError> {
        let mut request = self.client.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AttemptError::Transport(describe(&e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AttemptError::Transport(describe(&e)))?;
        debug!("{} {} -> {}: {}", method, url, status, text);

        if !status.is_success() {
            return Err(AttemptError::Status { status, body: text });
        }
        Ok(text)
    }

    async fn observe_snapshot(&self, url: &str) -> Result<SnapshotObservation, AttemptError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AttemptError::Transport(describe(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Transport(describe(&e)))?;

        let snapshots = if status.is_success() {
            match serde_json::from_str::<SnapshotList>(&body) {
                Ok(list) => list.snapshots,
                Err(e) => {
                    warn!("Could not parse snapshot listing from {}: {}", url, e);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Ok(SnapshotObservation {
            status,
            snapshots,
            body,
        })
    }

    async fn delete_once(&self, url: &str) -> Result<(), AttemptError> {
        self.attempt(Method::DELETE, url, None::<&()>).await?;
        Ok(())
    }

    async fn indices_cleared(&self) -> Result<bool, AttemptError> {
        let indices = self.list_indices().await?;
        if !indices.is_empty() {
            let names: Vec<&str> = indices.iter().map(|i| i.index.as_str()).collect();
            debug!("{} indices still present: {}", indices.len(), names.join(", "));
        }
        Ok(indices.is_empty())
    }
}

fn request_failed(method: Method, url: &str, failure: RetryFailure<AttemptError>) -> HttpError {
    if !failure.exhausted {
        warn!(
            "{} {} rejected with a non-retryable error after {} attempt(s)",
            method,
            url,
            failure.errors.len()
        );
    }
    HttpError::RequestFailed {
        method: method.to_string(),
        url: url.to_string(),
        attempts: failure.messages(),
    }
}

/// reqwest's Display omits the cause chain, which holds the useful part
/// ("connection refused", "operation timed out").
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = StdError::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
