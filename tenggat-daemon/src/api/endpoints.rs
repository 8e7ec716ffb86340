use super::{
    errors::{ApiError, ApiErrorKind, ApiResult},
    AppState,
};

use anyhow::anyhow;
use axum::{
    extract::{rejection::JsonRejection, Json, Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;
use tenggat_types::{
    select_tasks, CreateTask, Deleted, EditTask, ReminderSettings, StatusFilter, Summary, Task,
    TaskSort, TestMessage,
};
use uuid::Uuid;

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::new(ApiErrorKind::BadRequest, anyhow!(rejection.body_text())))
}

fn task_not_found(id: Uuid) -> ApiError {
    ApiError::new(ApiErrorKind::NotFound, anyhow!("Task {id} does not exist"))
}

#[tracing::instrument(skip_all, err(Debug))]
pub async fn create_task_endpoint(
    State(state): State<AppState>,
    payload: Result<Json<CreateTask>, JsonRejection>,
) -> ApiResult<Task> {
    let task = state.store.add_task(parse_body(payload)?);
    tracing::info!("Created task {}", task.id);

    Ok((StatusCode::CREATED, Json(task)))
}

#[derive(Debug, Deserialize)]
pub struct ListTasksParams {
    status: Option<StatusFilter>,
    sort: Option<TaskSort>,
}

#[tracing::instrument(skip(state), err(Debug))]
pub async fn list_tasks_endpoint(
    State(state): State<AppState>,
    Query(params): Query<ListTasksParams>,
) -> ApiResult<Vec<Task>> {
    let tasks = select_tasks(
        state.store.tasks(),
        params.status.unwrap_or_default(),
        params.sort.unwrap_or_default(),
        Utc::now(),
    );

    Ok((StatusCode::OK, Json(tasks)))
}

#[tracing::instrument(skip(state), err(Debug))]
pub async fn find_task_endpoint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Task> {
    match state.store.find_task(id) {
        Some(task) => Ok((StatusCode::OK, Json(task))),
        None => Err(task_not_found(id)),
    }
}

#[tracing::instrument(skip(state, payload), err(Debug))]
pub async fn edit_task_endpoint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<EditTask>, JsonRejection>,
) -> ApiResult<Task> {
    match state.store.edit_task(id, parse_body(payload)?) {
        Some(task) => Ok((StatusCode::OK, Json(task))),
        None => Err(task_not_found(id)),
    }
}

#[tracing::instrument(skip(state), err(Debug))]
pub async fn toggle_task_endpoint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Task> {
    match state.store.toggle_task(id) {
        Some(task) => Ok((StatusCode::OK, Json(task))),
        None => Err(task_not_found(id)),
    }
}

#[tracing::instrument(skip(state), err(Debug))]
pub async fn delete_task_endpoint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Task> {
    match state.store.delete_task(id) {
        Some(task) => Ok((StatusCode::OK, Json(task))),
        None => Err(task_not_found(id)),
    }
}

#[tracing::instrument(skip(state), err(Debug))]
pub async fn delete_all_tasks_endpoint(State(state): State<AppState>) -> ApiResult<Deleted> {
    let deleted = state.store.delete_all_tasks();
    tracing::info!("Deleted {deleted} tasks");

    Ok((StatusCode::OK, Json(Deleted { deleted })))
}

#[tracing::instrument(skip(state), err(Debug))]
pub async fn summary_endpoint(State(state): State<AppState>) -> ApiResult<Summary> {
    Ok((StatusCode::OK, Json(Summary::of(&state.store.tasks()))))
}

#[tracing::instrument(skip(state), err(Debug))]
pub async fn get_settings_endpoint(State(state): State<AppState>) -> ApiResult<ReminderSettings> {
    Ok((StatusCode::OK, Json(state.store.settings())))
}

#[tracing::instrument(skip_all, err(Debug))]
pub async fn update_settings_endpoint(
    State(state): State<AppState>,
    payload: Result<Json<ReminderSettings>, JsonRejection>,
) -> ApiResult<ReminderSettings> {
    let settings = parse_body(payload)?;
    tracing::info!(
        "Updating reminder settings, target {:?}, token {:?}",
        settings.target_address,
        settings.masked_token()
    );
    state.store.update_settings(settings.clone());

    Ok((StatusCode::OK, Json(settings)))
}

#[tracing::instrument(skip(state), err(Debug))]
pub async fn test_settings_endpoint(State(state): State<AppState>) -> ApiResult<TestMessage> {
    match state.reminders.send_test_message().await {
        Some(sent) => Ok((StatusCode::OK, Json(TestMessage { sent }))),
        None => Err(ApiError::new(
            ApiErrorKind::BadRequest,
            anyhow!("Reminder settings are incomplete"),
        )),
    }
}
