//! Mock search cluster for testing the snapshot API client
//!
//! This simulates the cluster's snapshot endpoints without requiring a real
//! cluster or object storage.

use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

/// Mock cluster that answers snapshot API requests
pub struct MockCluster {
    pub server: MockServer,
    pub base_url: String,
}

/// A single snapshot entry as the cluster reports it
pub fn snapshot_record(snapshot: &str, state: &str) -> Value {
    json!({
        "snapshot": snapshot,
        "uuid": "dKb54xw67gvdRctLCxSlnA",
        "version_id": 7100099,
        "version": "7.10.0",
        "indices": ["logs-2025.01.15", "metrics-2025.01.15"],
        "state": state,
        "start_time": "2025-01-15T00:00:01.000Z",
        "start_time_in_millis": 1736899201000i64,
        "end_time": "2025-01-15T00:02:11.000Z",
        "end_time_in_millis": 1736899331000i64,
        "duration_in_millis": 130000,
        "failures": [],
        "shards": {"total": 10, "failed": 0, "successful": 10}
    })
}

impl MockCluster {
    /// Create a new mock cluster
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    /// Repository PUT succeeds
    pub async fn mock_repository_ok(&self, repository: &str) {
        self.mock_repository_status(repository, 200).await;
    }

    /// Repository PUT always answers with `status`
    pub async fn mock_repository_status(&self, repository: &str, status: u16) {
        Mock::given(method("PUT"))
            .and(path(format!("/_snapshot/{}", repository)))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "acknowledged": status == 200
            })))
            .mount(&self.server)
            .await;
    }

    /// Repository PUT answers with `status` once, then falls through to later mocks
    pub async fn mock_repository_status_once(&self, repository: &str, status: u16) {
        Mock::given(method("PUT"))
            .and(path(format!("/_snapshot/{}", repository)))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
    }

    /// Snapshot PUT is accepted
    pub async fn mock_snapshot_created(&self, repository: &str, snapshot: &str) {
        self.mock_snapshot_create_status(repository, snapshot, 200).await;
    }

    pub async fn mock_snapshot_create_status(&self, repository: &str, snapshot: &str, status: u16) {
        Mock::given(method("PUT"))
            .and(path(format!("/_snapshot/{}/{}", repository, snapshot)))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "accepted": status == 200
            })))
            .mount(&self.server)
            .await;
    }

    /// Snapshot GET reports the given states in order, one per request.
    /// Requests beyond the sequence get a 404 unless another mock matches.
    pub async fn mock_snapshot_states(&self, repository: &str, snapshot: &str, states: &[&str]) {
        for state in states {
            Mock::given(method("GET"))
                .and(path(format!("/_snapshot/{}/{}", repository, snapshot)))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "snapshots": [snapshot_record(snapshot, state)]
                })))
                .up_to_n_times(1)
                .mount(&self.server)
                .await;
        }
    }

    /// Snapshot GET always reports `state`
    pub async fn mock_snapshot_state_always(&self, repository: &str, snapshot: &str, state: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/_snapshot/{}/{}", repository, snapshot)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "snapshots": [snapshot_record(snapshot, state)]
            })))
            .mount(&self.server)
            .await;
    }

    /// Snapshot GET always answers with `status` and no snapshot records
    pub async fn mock_snapshot_status_always(&self, repository: &str, snapshot: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/_snapshot/{}/{}", repository, snapshot)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Snapshot GET answers once with an arbitrary status and body
    pub async fn mock_snapshot_response_once(
        &self,
        repository: &str,
        snapshot: &str,
        status: u16,
        body: Value,
    ) {
        Mock::given(method("GET"))
            .and(path(format!("/_snapshot/{}/{}", repository, snapshot)))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
    }

    /// DELETE /* always answers with `status`
    pub async fn mock_delete_all_status(&self, status: u16) {
        Mock::given(method("DELETE"))
            .and(path("/*"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "acknowledged": status == 200
            })))
            .mount(&self.server)
            .await;
    }

    /// DELETE /* answers with `status` once, then falls through to later mocks
    pub async fn mock_delete_all_status_once(&self, status: u16) {
        Mock::given(method("DELETE"))
            .and(path("/*"))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
    }

    /// Index listing used by the delete pre-check
    pub async fn mock_indices_listing(&self, indices: &[&str]) {
        let rows: Vec<Value> = indices
            .iter()
            .map(|index| json!({"health": "green", "status": "open", "index": index}))
            .collect();

        Mock::given(method("GET"))
            .and(path("/_cat/indices/*"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(rows)))
            .mount(&self.server)
            .await;
    }

    /// Restore POST answers with `status`
    pub async fn mock_restore_status(&self, repository: &str, snapshot: &str, status: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/_snapshot/{}/{}/_restore", repository, snapshot)))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "accepted": status == 200
            })))
            .mount(&self.server)
            .await;
    }

    /// Number of received requests with the given method and path
    pub async fn count(&self, http_method: &str, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
            .count()
    }

    /// Body of the first matching request, parsed as JSON
    pub async fn first_body(&self, http_method: &str, request_path: &str) -> Option<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .find(|r| r.method.as_str() == http_method && r.url.path() == request_path)
            .and_then(|r| serde_json::from_slice(&r.body).ok())
    }

    /// Total number of requests of any kind
    pub async fn total_requests(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}
