//! Asynchronous theming job models.
//!
//! Theme imports run server-side: a job is created, the archive is uploaded
//! to the storage location the job hands back, and the job is then polled
//! until it leaves `pending`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Still running.
    Pending,
    /// Finished successfully.
    Completed,
    /// Finished with errors.
    Failed,
}

impl JobStatus {
    /// Returns true once the job will not change any more.
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

/// One error reported by a failed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobError {
    /// Human-readable title.
    #[serde(default)]
    pub title: String,

    /// Machine-readable code.
    #[serde(default)]
    pub code: String,
}

impl JobError {
    /// Renders the error as `<title>: <code>`.
    pub fn display(&self) -> String {
        format!("{}: {}", self.title, self.code)
    }
}

/// Where and how to upload the job's input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobUpload {
    /// Signed storage URL.
    pub url: String,

    /// Form fields that must accompany the file.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct JobData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upload: Option<JobUpload>,
}

/// A theming job as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeJob {
    /// Job identifier.
    pub id: String,

    /// Current state.
    pub status: JobStatus,

    /// Errors, present when the job failed.
    #[serde(default)]
    pub errors: Vec<JobError>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    upload: Option<JobUpload>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<JobData>,
}

impl ThemeJob {
    /// Upload instructions, whether sent at the top level or under `data`.
    pub fn upload(&self) -> Option<&JobUpload> {
        self.upload
            .as_ref()
            .or_else(|| self.data.as_ref().and_then(|d| d.upload.as_ref()))
    }

    /// Errors rendered as `<title>: <code>`.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(JobError::display).collect()
    }
}

/// Response wrapper for job operations.
#[derive(Debug, Clone, Deserialize)]
pub struct JobResponse {
    /// The job.
    pub job: ThemeJob,
}
