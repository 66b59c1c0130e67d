use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tracks the lifecycle status of an asset processing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    /// Completed and failed jobs take no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::InProgress => write!(f, "in_progress"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Snapshot of a job handed to the executor by the dispatcher.
///
/// The job store owns the record; the worker only reads this snapshot and
/// writes changes back through [`JobUpdate`]s.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub asset_id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub last_heart_beat: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
impl Job {
    pub fn new(id: impl Into<String>, asset_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            asset_id: asset_id.into(),
            status: JobStatus::Pending,
            attempts: 0,
            error_message: None,
            last_heart_beat: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Partial set of job fields written back to the job store.
///
/// Fields left as `None` are omitted from the request body and keep their
/// stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_heart_beat: Option<DateTime<Utc>>,
}

impl JobUpdate {
    pub fn in_progress() -> Self {
        Self {
            status: Some(JobStatus::InProgress),
            ..Default::default()
        }
    }

    pub fn completed() -> Self {
        Self {
            status: Some(JobStatus::Completed),
            ..Default::default()
        }
    }

    /// Failure write-back: attempts is the snapshot's count plus one.
    pub fn failed(job: &Job, message: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            error_message: Some(message.into()),
            attempts: Some(job.attempts.saturating_add(1)),
            last_heart_beat: None,
        }
    }

    pub fn heartbeat(at: DateTime<Utc>) -> Self {
        Self {
            last_heart_beat: Some(at),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::InProgress.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn status_uses_snake_case_on_the_wire() {
        let json = serde_json::to_string(&JobStatus::InProgress).unwrap();
        assert_eq!(json, r#""in_progress""#);
        assert_eq!(JobStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn failed_update_increments_attempts() {
        let mut job = Job::new("job-1", "asset-1");
        job.attempts = 2;

        let update = JobUpdate::failed(&job, "boom");
        assert_eq!(update.status, Some(JobStatus::Failed));
        assert_eq!(update.attempts, Some(3));
        assert_eq!(update.error_message.as_deref(), Some("boom"));
    }

    #[test]
    fn partial_update_omits_absent_fields() {
        let json = serde_json::to_value(JobUpdate::in_progress()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "in_progress" }));

        let job = Job::new("job-1", "asset-1");
        let json = serde_json::to_value(JobUpdate::failed(&job, "nope")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status": "failed", "errorMessage": "nope", "attempts": 1 })
        );
    }

    #[test]
    fn job_deserializes_from_store_format() {
        let json = r#"{
            "id": "job-9",
            "assetId": "asset-3",
            "status": "pending",
            "attempts": 1,
            "errorMessage": null,
            "lastHeartBeat": "2024-05-01T10:00:00Z",
            "createdAt": "2024-05-01T09:59:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        }"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.id, "job-9");
        assert_eq!(job.asset_id, "asset-3");
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.attempts, 1);
        assert!(job.last_heart_beat.is_some());
    }

    #[test]
    fn job_attempts_default_to_zero() {
        let job: Job =
            serde_json::from_str(r#"{"id":"j","assetId":"a","status":"pending"}"#).unwrap();
        assert_eq!(job.attempts, 0);
        assert!(job.error_message.is_none());
    }
}
