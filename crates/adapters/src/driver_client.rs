//! Reqwest-backed HTTP client for talking to the driver (spec.md §4.7, §6).
//!
//! Used by both the worker loop (`get_task`/`task_done`) and the user CLI
//! (`submit_job`/`jobs_overview`/`job_details`). Kept in `winjobs-adapters`
//! rather than `winjobs-api` so the DTO crate stays free of an HTTP-client
//! dependency.

use std::path::Path;

use reqwest::multipart;
use winjobs_api::v1::{
    ErrorResponse, GetTaskRequest, GetTaskResponse, HealthResponse, JobOverviewDto, JobsOverviewResponse,
    SubmitJobResponse, TaskDoneRequest, TaskDoneResponse,
};
use winjobs_shared::{Error, ErrorClass, ErrorCode, Result};

/// A thin `reqwest::Client` wrapper bound to one driver base URL.
#[derive(Debug, Clone)]
pub struct DriverClient {
    http: reqwest::Client,
    base_url: String,
}

impl DriverClient {
    /// Build a client targeting `http://{driver_ip}:{driver_port}`.
    #[must_use]
    pub fn new(driver_ip: &str, driver_port: u16) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("http://{driver_ip}:{driver_port}"),
        }
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(transport_error)?;
        response.json().await.map_err(transport_error)
    }

    /// `POST /submit_job` (multipart upload).
    pub async fn submit_job(&self, zip_path: &Path, priority: u8, submitter: &str) -> Result<SubmitJobResponse> {
        let bytes = tokio::fs::read(zip_path).await.map_err(Error::from)?;
        let filename = zip_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "study.zip".to_owned());

        let part = multipart::Part::bytes(bytes).file_name(filename);
        let form = multipart::Form::new()
            .part("zip_file", part)
            .text("priority", priority.to_string())
            .text("submitter", submitter.to_owned());

        let response = self
            .http
            .post(format!("{}/submit_job", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let body: ErrorResponse = response.json().await.map_err(transport_error)?;
            return Err(Error::expected(ErrorCode::validation("submit_job_rejected"), body.error));
        }
        response.json().await.map_err(transport_error)
    }

    /// `GET /jobs_overview`.
    pub async fn jobs_overview(&self) -> Result<Vec<JobOverviewDto>> {
        let response = self
            .http
            .get(format!("{}/jobs_overview", self.base_url))
            .send()
            .await
            .map_err(transport_error)?;
        let body: JobsOverviewResponse = response.json().await.map_err(transport_error)?;
        Ok(body.jobs)
    }

    /// `GET /job_details/{id}`.
    pub async fn job_details(&self, job_id: &str) -> Result<Option<JobOverviewDto>> {
        let response = self
            .http
            .get(format!("{}/job_details/{job_id}", self.base_url))
            .send()
            .await
            .map_err(transport_error)?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        response.json().await.map_err(transport_error)
    }

    /// `POST /get_task`.
    pub async fn get_task(&self, worker: &str, cores: u32) -> Result<GetTaskResponse> {
        let request = GetTaskRequest {
            worker: worker.to_owned(),
            cores,
        };
        let response = self
            .http
            .post(format!("{}/get_task", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;
        response.json().await.map_err(transport_error)
    }

    /// `POST /task_done`.
    pub async fn task_done(&self, request: &TaskDoneRequest) -> Result<TaskDoneResponse> {
        let response = self
            .http
            .post(format!("{}/task_done", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        response.json().await.map_err(transport_error)
    }
}

fn transport_error(error: reqwest::Error) -> Error {
    Error::unexpected(ErrorCode::new("http_client", "transport"), error.to_string(), ErrorClass::Retriable)
}
