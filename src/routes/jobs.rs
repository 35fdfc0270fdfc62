//! Export and import job endpoints
//!
//! - POST /api/export - Create an export job
//! - GET /api/export - List export jobs grouped by state
//! - POST /api/import - Create an import job
//! - GET /api/import - List import jobs grouped by state

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::jobs::{ExportJob, ExportKind, ImportJob, ImportKind, JobsByState};
use crate::middleware::request_id;
use crate::models::{AppState, CreateExportJobRequest, CreateImportJobRequest};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/export", get(list_export_jobs).post(create_export_job))
        .route("/api/import", get(list_import_jobs).post(create_import_job))
        .with_state(state)
}

fn rejected(request_id: &str, rejection: JsonRejection) -> AppError {
    warn!(request_id = %request_id, error = %rejection.body_text(), "Malformed job request body");
    AppError::Validation(vec![rejection.body_text()])
}

/// POST /api/export
async fn create_export_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateExportJobRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ExportJob>)> {
    let request_id = request_id(&headers);
    let started = Instant::now();
    info!(request_id = %request_id, "Received create export job request");

    let Json(request) = payload.map_err(|rejection| rejected(&request_id, rejection))?;
    debug!(request_id = %request_id, body = ?request, "Create export job data");

    let (book_id, kind) = request.into_parts().inspect_err(|err| {
        warn!(request_id = %request_id, errors = %err, "Invalid create export job data");
    })?;

    let job = state.jobs.create_export_job(book_id, kind).await;

    info!(
        request_id = %request_id,
        job_id = %job.id,
        processing_ms = started.elapsed().as_millis() as u64,
        "Export job created successfully"
    );
    Ok((StatusCode::CREATED, Json(job)))
}

/// POST /api/import
async fn create_import_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateImportJobRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ImportJob>)> {
    let request_id = request_id(&headers);
    let started = Instant::now();
    info!(request_id = %request_id, "Received create import job request");

    let Json(request) = payload.map_err(|rejection| rejected(&request_id, rejection))?;
    // The source URL may carry credentials, so it stays out of the logs.
    debug!(
        request_id = %request_id,
        book_id = ?request.book_id,
        kind = ?request.kind,
        "Create import job data"
    );

    let (book_id, kind, source_url) = request.into_parts().inspect_err(|err| {
        warn!(request_id = %request_id, errors = %err, "Invalid create import job data");
    })?;

    let job = state.jobs.create_import_job(book_id, kind, source_url).await;

    info!(
        request_id = %request_id,
        job_id = %job.id,
        processing_ms = started.elapsed().as_millis() as u64,
        "Import job created successfully"
    );
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/export
async fn list_export_jobs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<JobsByState<ExportKind>> {
    let request_id = request_id(&headers);
    let started = Instant::now();
    info!(request_id = %request_id, "Received request to list export jobs");

    let jobs = state.jobs.list_export_jobs_by_state().await;

    info!(
        request_id = %request_id,
        processing_ms = started.elapsed().as_millis() as u64,
        "Export jobs listed successfully"
    );
    Json(jobs)
}

/// GET /api/import
async fn list_import_jobs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<JobsByState<ImportKind>> {
    let request_id = request_id(&headers);
    let started = Instant::now();
    info!(request_id = %request_id, "Received request to list import jobs");

    let jobs = state.jobs.list_import_jobs_by_state().await;

    info!(
        request_id = %request_id,
        processing_ms = started.elapsed().as_millis() as u64,
        "Import jobs listed successfully"
    );
    Json(jobs)
}
