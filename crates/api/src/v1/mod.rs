//! API v1 DTOs and helpers for the driver HTTP surface.

mod mappers;
mod types;
mod validation;

pub use mappers::{job_to_overview_dto, job_to_overview_dto_with_sequence, task_to_record_dto};
pub use types::{
    ErrorResponse, GetTaskRequest, GetTaskResponse, HealthResponse, JobOverviewDto, JobsOverviewResponse,
    SubmitJobResponse, TaskDoneRequest, TaskDoneResponse, TaskRecordDto,
};
pub use validation::{ApiV1ValidationError, validate_zip_filename};
