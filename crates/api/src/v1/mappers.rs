//! Mapping from domain entities to API v1 DTOs.

use winjobs_domain::{Job, JobDisposition, Task};

use crate::v1::types::{JobOverviewDto, TaskRecordDto};

/// Map a `Job` plus its current disposition to the overview DTO (spec.md
/// §4.1: `/jobs_overview`, `/job_details/{id}`).
#[must_use]
pub fn job_to_overview_dto(job: &Job, disposition: JobDisposition) -> JobOverviewDto {
    let (priority, sequence) = match disposition {
        JobDisposition::Queued => (Some(job.priority().value()), None),
        JobDisposition::Finished => (None, None),
    };
    JobOverviewDto {
        id: job.id().to_string(),
        submitter: job.submitter().to_string(),
        zip_file_path: job.zip_file_path().to_string_lossy().into_owned(),
        study_name: job.study().study_name.as_str().to_owned(),
        study_path: job.study().study_path.to_string_lossy().into_owned(),
        workload_length: job.workload().len(),
        percentage_complete: job.percentage_complete(),
        status: disposition.to_string(),
        priority,
        sequence,
    }
}

/// Same as [`job_to_overview_dto`] but also threads through the sequence
/// number, which only the queue (not the `Job` itself) owns.
#[must_use]
pub fn job_to_overview_dto_with_sequence(job: &Job, disposition: JobDisposition, sequence: Option<u64>) -> JobOverviewDto {
    let mut dto = job_to_overview_dto(job, disposition);
    if matches!(disposition, JobDisposition::Queued) {
        dto.sequence = sequence;
    }
    dto
}

/// Map a newly assigned `Task` plus its parent `Job` to the wire task
/// record (spec.md §6: "Task record fields").
#[must_use]
pub fn task_to_record_dto(job: &Job, task: &Task) -> TaskRecordDto {
    TaskRecordDto {
        id: task.id().to_string(),
        job_id: job.id().to_string(),
        submitter: job.submitter().to_string(),
        priority: job.priority().value(),
        zip_file_path: job.zip_file_path().to_string_lossy().into_owned(),
        study_name: job.study().study_name.as_str().to_owned(),
        worker: task.worker().to_string(),
        workload: task.workload().to_vec(),
        percentage_complete: job.percentage_complete(),
    }
}
