//! HTTP handlers for the REST API.
//!
//! Each handler authenticates the caller, validates the body and delegates to
//! the service layer.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::auth::AuthUser;
use super::dto::{
    BulkCreateRequest, BulkSchedulesResponse, BulkUpdateRequest, CreateScheduleRequest,
    CreateSubjectRequest, HealthResponse, SubjectListResponse, UpdateScheduleRequest,
};
use super::error::AppError;
use super::json::ApiJson;
use super::state::AppState;
use crate::models::{Schedule, ScheduleId, Subject, SubjectId, UserId};
use crate::services::{ScheduleError, ScheduleInteractor, ScheduleListView, SubjectService};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

type Created<T> = Result<(StatusCode, Json<T>), AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repository = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        repository,
    }))
}

// =============================================================================
// Schedules
// =============================================================================

/// GET /v1/users/{user_id}/schedules
///
/// Calendar view of the caller's schedules, split into master and custom.
pub async fn list_schedules(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<String>,
) -> HandlerResult<ScheduleListView> {
    let user_id = UserId::new(user_id);
    if user_id != caller {
        return Err(ScheduleError::Forbidden.into());
    }
    let view = ScheduleInteractor::new(state.repository.as_ref())
        .get_list(&user_id)
        .await?;
    Ok(Json(view))
}

/// GET /v1/schedules/{schedule_id}
pub async fn get_schedule(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(schedule_id): Path<String>,
) -> HandlerResult<Schedule> {
    let schedule = ScheduleInteractor::new(state.repository.as_ref())
        .get_owned(&ScheduleId::new(schedule_id), &caller)
        .await?;
    Ok(Json(schedule))
}

/// POST /v1/schedules
pub async fn create_schedule(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(request): ApiJson<CreateScheduleRequest>,
) -> Created<Schedule> {
    let input = request
        .into_new_schedule(caller)
        .map_err(AppError::BadRequest)?;
    let schedule = ScheduleInteractor::new(state.repository.as_ref())
        .create(input)
        .await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

/// POST /v1/schedules/bulk
pub async fn create_schedules_bulk(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(request): ApiJson<BulkCreateRequest>,
) -> Created<BulkSchedulesResponse> {
    let items = request
        .into_new_schedules(&caller)
        .map_err(AppError::BadRequest)?;
    let schedules = ScheduleInteractor::new(state.repository.as_ref())
        .create_bulk(items)
        .await?;
    Ok((StatusCode::CREATED, Json(BulkSchedulesResponse { schedules })))
}

/// PUT /v1/schedules/{schedule_id}
pub async fn update_schedule(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(schedule_id): Path<String>,
    ApiJson(request): ApiJson<UpdateScheduleRequest>,
) -> HandlerResult<Schedule> {
    let update = request
        .into_update(ScheduleId::new(schedule_id))
        .map_err(AppError::BadRequest)?;
    let schedule = ScheduleInteractor::new(state.repository.as_ref())
        .update_owned(update, &caller)
        .await?;
    Ok(Json(schedule))
}

/// PUT /v1/schedules/bulk
pub async fn update_schedules_bulk(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(request): ApiJson<BulkUpdateRequest>,
) -> HandlerResult<BulkSchedulesResponse> {
    let updates = request.into_updates().map_err(AppError::BadRequest)?;
    let schedules = ScheduleInteractor::new(state.repository.as_ref())
        .update_bulk_owned(updates, &caller)
        .await?;
    Ok(Json(BulkSchedulesResponse { schedules }))
}

/// DELETE /v1/schedules/{schedule_id}
pub async fn delete_schedule(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(schedule_id): Path<String>,
) -> Result<StatusCode, AppError> {
    ScheduleInteractor::new(state.repository.as_ref())
        .delete_owned(&ScheduleId::new(schedule_id), &caller)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Subjects
// =============================================================================

/// GET /v1/subjects
pub async fn list_subjects(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> HandlerResult<SubjectListResponse> {
    let subjects = SubjectService::new(state.repository.as_ref())
        .list(&caller)
        .await?;
    Ok(Json(SubjectListResponse { subjects }))
}

/// POST /v1/subjects
pub async fn create_subject(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(request): ApiJson<CreateSubjectRequest>,
) -> Created<Subject> {
    request.validate().map_err(AppError::BadRequest)?;
    let subject = SubjectService::new(state.repository.as_ref())
        .create(caller, request.name, request.color)
        .await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

/// DELETE /v1/subjects/{subject_id}
pub async fn delete_subject(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(subject_id): Path<String>,
) -> Result<StatusCode, AppError> {
    SubjectService::new(state.repository.as_ref())
        .delete_owned(&SubjectId::new(subject_id), &caller)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
