//! The driver's axum HTTP surface (spec.md §4.1, §6).
//!
//! Every handler is a thin translation layer: parse/validate the wire
//! request, call into `winjobs-app`/`winjobs-ports`, map the result back to
//! an API v1 DTO. Business logic stays in `winjobs-app::queue::JobQueue`
//! and `winjobs-app::prepare`.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use tower_http::trace::TraceLayer;

use winjobs_api::v1::{
    job_to_overview_dto_with_sequence, task_to_record_dto, validate_zip_filename, ErrorResponse, GetTaskRequest,
    GetTaskResponse, HealthResponse, JobsOverviewResponse, SubmitJobResponse, TaskDoneRequest, TaskDoneResponse,
};
use winjobs_app::prepare::{prepare_job_for_queue, validate_job_parameters, JobSubmission};
use winjobs_app::queue::FinishTaskRequest;
use winjobs_domain::{JobId, TaskId, WorkerName};

use crate::driver_state::DriverState;

/// Build the driver's axum router over a shared [`DriverState`].
#[must_use]
pub fn build_router(state: Arc<DriverState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/submit_job", post(submit_job))
        .route("/jobs_overview", get(jobs_overview))
        .route("/job_details/{id}", get(job_details))
        .route("/get_task", post(get_task))
        .route("/task_done", post(task_done))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Multipart fields pulled off the `/submit_job` upload, before the zip
/// bytes have been persisted to the shared namespace.
struct SubmitJobUpload {
    filename: String,
    bytes: Vec<u8>,
    priority: i64,
    submitter: String,
}

async fn collect_submit_job_upload(mut multipart: Multipart) -> Result<SubmitJobUpload, String> {
    let mut filename: Option<String> = None;
    let mut bytes: Option<Vec<u8>> = None;
    let mut priority: Option<i64> = None;
    let mut submitter: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|err| err.to_string())? {
        match field.name().unwrap_or_default() {
            "zip_file" => {
                filename = Some(field.file_name().unwrap_or("study.zip").to_owned());
                bytes = Some(field.bytes().await.map_err(|err| err.to_string())?.to_vec());
            },
            "priority" => {
                let text = field.text().await.map_err(|err| err.to_string())?;
                priority = text.trim().parse::<i64>().ok();
            },
            "submitter" => {
                submitter = Some(field.text().await.map_err(|err| err.to_string())?);
            },
            _ => {},
        }
    }

    Ok(SubmitJobUpload {
        filename: filename.ok_or_else(|| "missing zip_file field".to_owned())?,
        bytes: bytes.ok_or_else(|| "missing zip_file field".to_owned())?,
        priority: priority.ok_or_else(|| "missing or non-numeric priority field".to_owned())?,
        submitter: submitter.ok_or_else(|| "missing submitter field".to_owned())?,
    })
}

/// `POST /submit_job` (spec.md §4.1, §4.2, §4.3).
///
/// A malformed multipart shape (missing fields, non-`.zip` filename)
/// returns 400. Once the upload is well-formed, every further failure
/// (bad priority, bad submitter, invalid study, ...) is reported as a 200
/// with an `{error}` body, matching the driver's original behavior.
async fn submit_job(State(state): State<Arc<DriverState>>, multipart: Multipart) -> Response {
    let upload = match collect_submit_job_upload(multipart).await {
        Ok(upload) => upload,
        Err(message) => return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response(),
    };

    if let Err(error) = validate_zip_filename(&upload.filename) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(error))).into_response();
    }

    let study_name = upload.filename[..upload.filename.len() - 4].to_owned();
    let zip_file_path = state.new_jobs_zip_folder_path.join(&upload.filename);

    if zip_file_path.exists() {
        let message = format!("File {} already exists on server.", upload.filename);
        return Json(ErrorResponse::new(message)).into_response();
    }

    if let Err(error) = tokio::fs::write(&zip_file_path, &upload.bytes).await {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(error))).into_response();
    }

    let submission = JobSubmission {
        priority: upload.priority,
        submitter: upload.submitter,
        zip_file_path,
        study_name,
    };

    match submit_job_use_case(&state, submission).await {
        Ok(response) => Json(response).into_response(),
        Err(error) => Json(ErrorResponse::new(error)).into_response(),
    }
}

async fn submit_job_use_case(state: &Arc<DriverState>, submission: JobSubmission) -> Result<SubmitJobResponse, winjobs_shared::Error> {
    let extraction_root = state.new_jobs_study_folder_path.clone();
    let (priority, submitter, study_name) = validate_job_parameters(&submission, &extraction_root)?;

    let state = Arc::clone(state);
    let zip_file_path = submission.zip_file_path.clone();

    let job = tokio::task::spawn_blocking(move || {
        prepare_job_for_queue(
            priority,
            submitter,
            zip_file_path,
            study_name,
            &extraction_root,
            state.archive.as_ref(),
            state.study_handle.as_ref(),
        )
    })
    .await
    .map_err(|err| {
        winjobs_shared::Error::unexpected(
            winjobs_shared::ErrorCode::internal(),
            err.to_string(),
            winjobs_shared::ErrorClass::NonRetriable,
        )
    })??;

    let job_id = job.id();
    let workload_length = job.workload().len();
    state.queue.add_job(job)?;

    Ok(SubmitJobResponse {
        job_id: job_id.to_string(),
        workload_length,
        job_queue_length: state.queue.get_queue_length(),
    })
}

async fn jobs_overview(State(state): State<Arc<DriverState>>) -> Json<JobsOverviewResponse> {
    let jobs = state
        .queue
        .jobs_overview()
        .iter()
        .map(|snapshot| job_to_overview_dto_with_sequence(&snapshot.job, snapshot.disposition, snapshot.sequence))
        .collect();
    Json(JobsOverviewResponse { jobs })
}

async fn job_details(State(state): State<Arc<DriverState>>, Path(id): Path<String>) -> Response {
    let Ok(job_id) = JobId::parse(&id) else {
        return (StatusCode::NOT_FOUND, Json(ErrorResponse::new("job id is not a valid UUID"))).into_response();
    };

    match state.queue.get_job_by_id(job_id) {
        Some(snapshot) => Json(job_to_overview_dto_with_sequence(&snapshot.job, snapshot.disposition, snapshot.sequence)).into_response(),
        None => (StatusCode::NOT_FOUND, Json(ErrorResponse::new("no such job"))).into_response(),
    }
}

/// `POST /get_task` (spec.md §4.1, §4.4, §4.7). One assigned core solves
/// one year, so `amount` is the worker's reported `cores`.
async fn get_task(State(state): State<Arc<DriverState>>, Json(request): Json<GetTaskRequest>) -> Response {
    let Ok(worker) = WorkerName::parse(&request.worker) else {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new("worker must be non-empty"))).into_response();
    };

    let amount = usize::try_from(request.cores).unwrap_or(1).max(1);

    match state.queue.assign_task(worker, amount, Utc::now()) {
        Ok(Some(task)) => {
            let Some(snapshot) = state.queue.get_job_by_id(task.job_id()) else {
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new("assigned task's job vanished"))).into_response();
            };
            Json(GetTaskResponse::Assigned(task_to_record_dto(&snapshot.job, &task))).into_response()
        },
        Ok(None) => Json(GetTaskResponse::no_work()).into_response(),
        Err(error) => (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(error))).into_response(),
    }
}

async fn task_done(State(state): State<Arc<DriverState>>, Json(request): Json<TaskDoneRequest>) -> Response {
    let (Ok(task_id), Ok(job_id)) = (TaskId::parse(&request.task_id), JobId::parse(&request.job_id)) else {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new("task_id/job_id must be valid UUIDs"))).into_response();
    };

    let result = state.queue.finish_task(FinishTaskRequest {
        task_id,
        job_id,
        workload: request.workload,
        output_path: request.output_path.into(),
        success: request.success,
    });

    match result {
        Ok(()) => Json(TaskDoneResponse::default()).into_response(),
        Err(error) => (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(error))).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver_state::build_driver_state;
    use tempfile::tempdir;
    use winjobs_config::DriverConfig;

    fn sample_state(dir: &tempfile::TempDir) -> Arc<DriverState> {
        let config = DriverConfig {
            persisted_queue_folder_path: dir.path().join("queue").to_string_lossy().into_owned(),
            new_jobs_zip_folder_path: dir.path().join("zip").to_string_lossy().into_owned(),
            new_jobs_study_folder_path: dir.path().join("studies").to_string_lossy().into_owned(),
            ..DriverConfig::default()
        };
        build_driver_state(&config).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let dir = tempdir().unwrap();
        let state = sample_state(&dir);
        let Json(response) = health().await;
        let _ = state;
        assert_eq!(response.status, "ok");
    }

    #[tokio::test]
    async fn job_details_reports_not_found_for_unknown_id() {
        let dir = tempdir().unwrap();
        let state = sample_state(&dir);
        let response = job_details(State(state), Path(JobId::new().to_string())).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_task_reports_no_work_on_empty_queue() {
        let dir = tempdir().unwrap();
        let state = sample_state(&dir);
        let response = get_task(
            State(state),
            Json(GetTaskRequest {
                worker: "w1".to_owned(),
                cores: 4,
            }),
        )
        .await;
        assert_eq!(response.into_response().status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn task_done_rejects_malformed_ids() {
        let dir = tempdir().unwrap();
        let state = sample_state(&dir);
        let response = task_done(
            State(state),
            Json(TaskDoneRequest {
                task_id: "not-a-uuid".to_owned(),
                job_id: "not-a-uuid".to_owned(),
                workload: vec![0],
                output_path: "/tmp/whatever".to_owned(),
                success: true,
            }),
        )
        .await;
        assert_eq!(response.into_response().status(), StatusCode::BAD_REQUEST);
    }

    fn multipart_body(boundary: &str, filename: &str, bytes: &[u8], priority: &str, submitter: &str) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(format!("Content-Disposition: form-data; name=\"zip_file\"; filename=\"{filename}\"\r\n").as_bytes());
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"priority\"\r\n\r\n");
        body.extend_from_slice(priority.as_bytes());
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"submitter\"\r\n\r\n");
        body.extend_from_slice(submitter.as_bytes());
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        body
    }

    #[tokio::test]
    async fn submit_job_rejects_duplicate_upload_name_with_business_error() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let dir = tempdir().unwrap();
        let state = sample_state(&dir);

        std::fs::write(state.new_jobs_zip_folder_path.join("alpha.zip"), b"already here").unwrap();

        let router = build_router(state);
        let boundary = "winjobs-test-boundary";
        let body = multipart_body(boundary, "alpha.zip", b"fake zip bytes", "50", "alice");

        let request = Request::builder()
            .method("POST")
            .uri("/submit_job")
            .header("content-type", format!("multipart/form-data; boundary={boundary}"))
            .body(Body::from(body))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(parsed.error.contains("already exists"));
    }
}
