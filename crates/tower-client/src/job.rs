//! Job lifecycle operations: launch a template, poll for completion, fetch
//! output events with client-side dedup, and read the final verdict.

use std::collections::HashSet;
use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::TowerError;
use crate::resolve::{resolve, Collection};
use crate::transport::{Method, Transport};

/// Parameters for one launch request. Only `job_template` is required;
/// empty optional fields are left out of the wire body entirely rather
/// than sent as empty values.
#[derive(Debug, Clone, Default)]
pub struct JobRequest {
    /// Job template id or display name.
    pub job_template: String,
    /// Structured overrides document passed through verbatim.
    pub extra_vars: String,
    /// Host pattern restricting which managed hosts the run applies to.
    pub limit: String,
    pub job_tags: String,
    /// Inventory id or name.
    pub inventory: String,
    /// Credential id or name.
    pub credential: String,
}

impl JobRequest {
    pub fn new(job_template: impl Into<String>) -> Self {
        Self {
            job_template: job_template.into(),
            ..Self::default()
        }
    }
}

/// Numeric id of one launched job; the sole handle for all polling and
/// event calls that follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobHandle(pub i64);

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One unit of streamed job output.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub id: i64,
    /// Raw stdout blob; may carry embedded CRLFs and ANSI color codes.
    #[serde(default)]
    pub stdout: String,
}

#[derive(Debug, Deserialize)]
struct EventsPage {
    #[serde(default)]
    results: Vec<EventRecord>,
}

/// Client for one job run against one server. Owns the set of event ids
/// already surfaced, so it must not be shared across concurrent runs;
/// discard it when the run ends.
pub struct JobClient {
    transport: Transport,
    seen_events: HashSet<i64>,
}

impl JobClient {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            seen_events: HashSet::new(),
        }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Launches the job template and returns the new job's id.
    ///
    /// The template reference is validated as non-empty before any network
    /// call, then template/inventory/credential references are resolved to
    /// numeric ids. The body carries only the overrides that were actually
    /// supplied.
    pub async fn submit(&self, request: &JobRequest) -> Result<JobHandle, TowerError> {
        if request.job_template.trim().is_empty() {
            return Err(TowerError::Validation(
                "job template reference must not be empty".into(),
            ));
        }

        let template_id =
            resolve(&self.transport, &request.job_template, Collection::JobTemplates).await?;

        let mut body = serde_json::Map::new();
        // Resolved ids are sent as strings; the server accepts either form
        // and gets to reject anything we did not pre-check.
        if !request.inventory.is_empty() {
            let inventory =
                resolve(&self.transport, &request.inventory, Collection::Inventories).await?;
            body.insert("inventory".into(), Value::String(inventory));
        }
        if !request.credential.is_empty() {
            let credential =
                resolve(&self.transport, &request.credential, Collection::Credentials).await?;
            body.insert("credential".into(), Value::String(credential));
        }
        if !request.limit.is_empty() {
            body.insert("limit".into(), Value::String(request.limit.clone()));
        }
        if !request.job_tags.is_empty() {
            body.insert("job_tags".into(), Value::String(request.job_tags.clone()));
        }
        if !request.extra_vars.is_empty() {
            body.insert("extra_vars".into(), Value::String(request.extra_vars.clone()));
        }

        let path = format!("/api/v1/job_templates/{template_id}/launch/");
        let body = (!body.is_empty()).then(|| Value::Object(body));
        let response = self.transport.request(Method::Post, &path, body.as_ref()).await?;

        match response.status() {
            StatusCode::CREATED => {
                let text = response.text().await?;
                let value: Value = serde_json::from_str(&text).map_err(|err| {
                    TowerError::Protocol(format!("launch response is not json: {err}"))
                })?;
                match value.get("id").and_then(Value::as_i64) {
                    Some(id) => Ok(JobHandle(id)),
                    None => {
                        debug!(body = %text, "launch response carried no job id");
                        Err(TowerError::Protocol("no job id in launch response".into()))
                    }
                }
            }
            StatusCode::BAD_REQUEST => Err(TowerError::RequestRejected),
            status => Err(TowerError::UnexpectedStatus {
                status,
                context: "job launch".into(),
            }),
        }
    }

    /// Whether the job has reached a terminal state. The server reports
    /// `finished` as null (or the string "null") while the job is still
    /// running and a timestamp once it is done.
    pub async fn is_complete(&self, job: JobHandle) -> Result<bool, TowerError> {
        let status = self.job_status(job).await?;
        match status.get("finished") {
            None => Err(TowerError::Protocol(
                "job status response has no finished field".into(),
            )),
            Some(Value::Null) => Ok(false),
            Some(Value::String(text)) if text.eq_ignore_ascii_case("null") => Ok(false),
            Some(_) => Ok(true),
        }
    }

    /// Reads the server's `failed` flag. Meaningful once the job is
    /// complete, but reports whatever the server currently states.
    pub async fn is_failed(&self, job: JobHandle) -> Result<bool, TowerError> {
        let status = self.job_status(job).await?;
        match status.get("failed").and_then(Value::as_bool) {
            Some(failed) => Ok(failed),
            None => Err(TowerError::Protocol(
                "job status response has no failed field".into(),
            )),
        }
    }

    /// Fetches the job's full event list and returns only the events not
    /// yet surfaced by this client, in server order. Each id is marked
    /// seen as it is collected, so a later call never re-emits it.
    pub async fn fetch_new_events(
        &mut self,
        job: JobHandle,
    ) -> Result<Vec<EventRecord>, TowerError> {
        let path = format!("/api/v1/jobs/{job}/job_events/");
        let response = self.transport.request(Method::Get, &path, None).await?;
        if response.status() != StatusCode::OK {
            return Err(TowerError::UnexpectedStatus {
                status: response.status(),
                context: "job events".into(),
            });
        }

        // A page without a results key yields nothing rather than failing;
        // some server versions omit it while a job is starting up.
        let page: EventsPage = response.json().await.map_err(|err| {
            TowerError::Protocol(format!("unable to parse job events: {err}"))
        })?;

        let mut fresh = Vec::new();
        for event in page.results {
            if self.seen_events.insert(event.id) {
                fresh.push(event);
            }
        }
        Ok(fresh)
    }

    async fn job_status(&self, job: JobHandle) -> Result<Value, TowerError> {
        let path = format!("/api/v1/jobs/{job}/");
        let response = self.transport.request(Method::Get, &path, None).await?;
        if response.status() != StatusCode::OK {
            return Err(TowerError::UnexpectedStatus {
                status: response.status(),
                context: "job status".into(),
            });
        }
        response
            .json()
            .await
            .map_err(|err| TowerError::Protocol(format!("job status response is not json: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::ServerEndpoint;

    #[tokio::test]
    async fn empty_template_reference_fails_before_any_network_call() {
        let endpoint = ServerEndpoint::new("http://127.0.0.1:1").unwrap();
        let client = JobClient::new(Transport::new(endpoint).unwrap());
        let err = client.submit(&JobRequest::new("  ")).await.unwrap_err();
        assert!(matches!(err, TowerError::Validation(_)));
    }
}
