//! Help center theme import.
//!
//! Importing a theme is asynchronous on the server side:
//! 1. submit an import job for a brand and receive a signed upload location,
//! 2. POST the archive straight to that location as a multipart form,
//! 3. poll the job until it is `completed` or `failed`.
//!
//! Polling is bounded; a job that never leaves `pending` ends in
//! `ZenklyError::Timeout`.

use std::path::Path;
use std::time::Duration;

use serde_json::{json, Value};
use url::Url;

use crate::client::{MultipartUpload, ZendeskClient};
use crate::error::ZenklyError;
use crate::models::{JobResponse, JobStatus, ThemeJob};

/// Path of the theme import job endpoint.
const THEME_IMPORT_PATH: &str = "guide/theming/jobs/themes/imports.json";

/// Time between two status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Status checks before giving up.
pub const DEFAULT_MAX_POLLS: u32 = 300;

/// Submits, uploads and waits for asynchronous theme jobs.
pub struct JobPoller<'a> {
    client: &'a ZendeskClient,
    interval: Duration,
    max_polls: u32,
}

impl<'a> JobPoller<'a> {
    /// Creates a poller checking once per second, up to five minutes.
    pub fn new(client: &'a ZendeskClient) -> Self {
        Self {
            client,
            interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Sets the time between status checks.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the number of status checks before giving up.
    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls.max(1);
        self
    }

    /// Creates a theme import job for `brand_id`.
    pub async fn submit_theme_import(&self, brand_id: &str) -> Result<ThemeJob, ZenklyError> {
        let brand_id = brand_id.trim();
        if brand_id.is_empty() || !brand_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ZenklyError::validation(format!(
                "brand id must be numeric, got: {:?}",
                brand_id.chars().take(50).collect::<String>()
            )));
        }

        let body = json!({
            "job": {
                "attributes": {
                    "brand_id": brand_id,
                    "format": "zip"
                }
            }
        });
        let job = parse_job(self.client.post(THEME_IMPORT_PATH, &body).await?)?;

        tracing::info!(job_id = %job.id, brand_id, "Theme import job submitted");
        Ok(job)
    }

    /// Uploads the archive to the location the job handed back.
    ///
    /// The job's form parameters are sent as fields ahead of the file.
    pub async fn upload(
        &self,
        job: &ThemeJob,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ZenklyError> {
        let upload = job.upload().ok_or_else(|| {
            ZenklyError::response_format("job has no upload location", &job.id)
        })?;
        let url = Url::parse(&upload.url).map_err(|e| {
            ZenklyError::response_format(format!("invalid upload URL: {e}"), &upload.url)
        })?;

        let form = MultipartUpload {
            fields: upload
                .parameters
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            file_field: "file".to_string(),
            file_name: file_name.to_string(),
            bytes,
        };

        tracing::debug!(job_id = %job.id, host = ?url.host_str(), "Uploading theme archive");
        self.client.post_multipart(&url, &form).await?;
        Ok(())
    }

    /// Fetches the current state of a job.
    pub async fn job(&self, job_id: &str) -> Result<ThemeJob, ZenklyError> {
        let path = format!("guide/theming/jobs/{}.json", urlencoding::encode(job_id));
        parse_job(self.client.get(&path, &[]).await?)
    }

    /// Polls a job until it reaches a terminal state.
    ///
    /// # Errors
    ///
    /// - `ZenklyError::AsyncJobFailed` with every `<title>: <code>` error if the job failed
    /// - `ZenklyError::Timeout` if it is still pending after `max_polls` checks
    pub async fn wait(&self, job_id: &str) -> Result<ThemeJob, ZenklyError> {
        for attempt in 1..=self.max_polls {
            let job = self.job(job_id).await?;
            tracing::debug!(job_id, attempt, status = ?job.status, "Polled job");

            if job.status.is_terminal() {
                if job.status == JobStatus::Failed {
                    return Err(ZenklyError::AsyncJobFailed {
                        job_id: job.id.clone(),
                        errors: job.error_messages(),
                    });
                }
                return Ok(job);
            }

            if attempt < self.max_polls {
                tokio::time::sleep(self.interval).await;
            }
        }

        Err(ZenklyError::timeout(
            self.interval * self.max_polls,
            format!("theme import job {job_id}"),
        ))
    }

    /// Runs the whole import: submit, upload `archive`, wait for the result.
    pub async fn import_theme(
        &self,
        brand_id: &str,
        archive: &Path,
    ) -> Result<ThemeJob, ZenklyError> {
        let bytes = tokio::fs::read(archive)
            .await
            .map_err(|e| ZenklyError::local_input(archive, e.to_string()))?;
        let file_name = archive
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("theme.zip")
            .to_string();

        let job = self.submit_theme_import(brand_id).await?;
        self.upload(&job, &file_name, bytes).await?;
        self.wait(&job.id).await
    }
}

/// Unwraps the `job` object of a job response.
fn parse_job(response: Value) -> Result<ThemeJob, ZenklyError> {
    match serde_json::from_value::<JobResponse>(response.clone()) {
        Ok(wrapper) => Ok(wrapper.job),
        Err(e) => Err(ZenklyError::response_format(
            format!("unexpected job response: {e}"),
            &response.to_string(),
        )),
    }
}
