use serde::Deserialize;
use serde_json::Value;
use tokio::time::{sleep, Instant};

use super::UploadClient;
use crate::errors::{AppError, AppResult};
use crate::handle::RemoteFile;
use crate::security::InputValidator;

pub const FROM_URL_PATH: &str = "/from_url/";
pub const FROM_URL_STATUS_PATH: &str = "/from_url/status/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Success,
    Error,
    /// Any other status the service reports while it is still working.
    #[serde(other)]
    InProgress,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Error)
    }
}

/// Decoded body of a `/from_url/status/` response.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: JobStatus,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Client-side view of one URL fetch running on the service.
#[derive(Debug)]
pub struct IngestionJob {
    token: String,
    status: JobStatus,
    polls: u32,
    started: Instant,
}

impl IngestionJob {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            status: JobStatus::Pending,
            polls: 0,
            started: Instant::now(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn polls(&self) -> u32 {
        self.polls
    }

    fn record(&mut self, status: JobStatus) {
        self.polls += 1;
        self.status = status;
    }
}

impl UploadClient {
    /// Ask the service to fetch `url`. Returns the job token.
    pub async fn submit_url(&self, url: &str) -> AppResult<String> {
        InputValidator::validate_source_url(url)?;
        // Sent as given; the parsed form would re-encode signed or pre-encoded URLs.
        let source_url = url.trim();

        let fields = vec![
            ("source_url".to_string(), source_url.to_string()),
            ("pub_key".to_string(), self.public_key().to_string()),
        ];
        let response = self.transport().post_form(FROM_URL_PATH, fields).await?;

        let token = response
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::protocol("from_url response has no \"token\""))?;

        log::debug!("Submitted {} for fetching, token {}", source_url, token);
        Ok(token.to_string())
    }

    /// One status check for a submitted job.
    pub async fn poll_status(&self, token: &str) -> AppResult<StatusResponse> {
        let fields = vec![("token".to_string(), token.to_string())];
        let response = self
            .transport()
            .post_form(FROM_URL_STATUS_PATH, fields)
            .await?;

        serde_json::from_value(response)
            .map_err(|e| AppError::protocol(format!("unexpected status response: {}", e)))
    }

    /// Have the service fetch `url` and wait until the job finishes.
    ///
    /// Polls every `poll_interval_ms`. Without `max_poll_attempts` or
    /// `poll_timeout_secs` configured this waits for as long as the job
    /// stays non-terminal. Dropping the future stops polling.
    pub async fn upload_url(&self, url: &str) -> AppResult<RemoteFile<'_>> {
        let token = self.submit_url(url).await?;
        let mut job = IngestionJob::new(token);

        loop {
            let response = self.poll_status(job.token()).await?;
            job.record(response.status);
            log::debug!(
                "Job {} is {:?} after {} poll(s)",
                job.token(),
                job.status(),
                job.polls()
            );

            match response.status {
                JobStatus::Success => {
                    let file_id = response.file_id.ok_or_else(|| {
                        AppError::protocol("successful status response has no \"file_id\"")
                    })?;
                    log::info!("Fetched {} as {}", url, file_id);
                    return Ok(RemoteFile::new(self, file_id));
                }
                JobStatus::Error => {
                    let message = response
                        .error
                        .unwrap_or_else(|| "job failed without an error message".to_string());
                    return Err(AppError::remote_job_failed(message));
                }
                JobStatus::Pending | JobStatus::InProgress => {}
            }

            if self.poll_budget_spent(&job) {
                return Err(AppError::PollTimeout {
                    token: job.token,
                    attempts: job.polls,
                });
            }

            sleep(self.config().poll_interval()).await;
        }
    }

    /// Same as [`upload_url`](Self::upload_url).
    pub async fn upload_from_url(&self, url: &str) -> AppResult<RemoteFile<'_>> {
        self.upload_url(url).await
    }

    fn poll_budget_spent(&self, job: &IngestionJob) -> bool {
        let config = self.config();

        if let Some(max_attempts) = config.max_poll_attempts {
            if job.polls >= max_attempts {
                return true;
            }
        }

        // Stop if the next poll would start past the deadline.
        if let Some(timeout) = config.poll_timeout() {
            if job.started.elapsed() + config.poll_interval() > timeout {
                return true;
            }
        }

        false
    }
}
