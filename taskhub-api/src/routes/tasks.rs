/// Task endpoints
///
/// # Endpoints
///
/// - `GET /task/` - List active tasks
/// - `GET /task/:id` - Get a task (inactive tasks included)
/// - `POST /task/create` - Create a task for an existing user
/// - `PUT /task/update?task_id=` - Replace a task's fields
/// - `DELETE /task/delete?task_id=` - Soft-delete a task
///
/// A user's tasks are listed under `GET /user/:id/tasks` (see `users`).

use super::{validate_sluggable, validate_text, TransactionResponse};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskhub_shared::models::{
    task::{CreateTask, Task, UpdateTask},
    user::User,
};
use validator::Validate;

/// Create task request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(
        length(min = 1, max = 255, message = "Title must be 1-255 characters"),
        custom(function = "validate_sluggable")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(
        length(max = 10000, message = "Content must be at most 10000 characters"),
        custom(function = "validate_text")
    )]
    pub content: String,

    #[serde(default)]
    #[validate(range(min = 0, max = 10, message = "Priority must be between 0 and 10"))]
    pub priority: i32,

    /// Owning user; must exist
    #[validate(range(min = 1, message = "User ID must be positive"))]
    pub user_id: i64,
}

/// Update task request
///
/// All fields are replaced, including the owner. The slug is re-derived
/// from `title`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(
        length(min = 1, max = 255, message = "Title must be 1-255 characters"),
        custom(function = "validate_sluggable")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(
        length(max = 10000, message = "Content must be at most 10000 characters"),
        custom(function = "validate_text")
    )]
    pub content: String,

    #[serde(default)]
    #[validate(range(min = 0, max = 10, message = "Priority must be between 0 and 10"))]
    pub priority: i32,

    #[validate(range(min = 1, message = "User ID must be positive"))]
    pub user_id: i64,
}

/// `?task_id=` query parameter
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TaskIdQuery {
    pub task_id: i64,
}

impl From<CreateTaskRequest> for CreateTask {
    fn from(req: CreateTaskRequest) -> Self {
        CreateTask {
            title: req.title,
            content: req.content,
            priority: req.priority,
            user_id: req.user_id,
        }
    }
}

impl From<UpdateTaskRequest> for UpdateTask {
    fn from(req: UpdateTaskRequest) -> Self {
        UpdateTask {
            title: req.title,
            content: req.content,
            priority: req.priority,
            user_id: req.user_id,
        }
    }
}

/// List active tasks
///
/// ```text
/// GET /task/
/// ```
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_active(&state.db).await?;
    Ok(Json(tasks))
}

/// Get a task by ID
///
/// ```text
/// GET /task/:id
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No task with this ID
pub async fn get_task(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Task>> {
    let Path(task_id) = path?;

    let task = Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(ApiError::task_not_found)?;

    Ok(Json(task))
}

/// Create a task
///
/// ```text
/// POST /task/create
/// Content-Type: application/json
///
/// {
///   "title": "Write report",
///   "content": "Quarterly numbers",
///   "priority": 2,
///   "user_id": 1
/// }
/// ```
///
/// The owner check and the insert run in one transaction.
///
/// # Errors
///
/// - `404 Not Found`: `user_id` does not name a user
/// - `422 Unprocessable Entity`: Field constraints failed
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TransactionResponse>)> {
    let Json(req) = payload?;
    req.validate()?;

    let mut tx = state.db.begin().await?;

    if !User::exists(&mut *tx, req.user_id).await? {
        return Err(ApiError::user_not_found());
    }

    let task = Task::create(&mut *tx, req.into()).await?;
    tx.commit().await?;

    tracing::info!(
        task_id = task.id,
        user_id = task.user_id,
        slug = %task.slug,
        "Task created"
    );

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse::created(task.id)),
    ))
}

/// Replace a task's fields
///
/// ```text
/// PUT /task/update?task_id=1
/// Content-Type: application/json
///
/// { "title": "Review report", "content": "", "priority": 1, "user_id": 2 }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No task with this ID, or the new owner does not exist
/// - `422 Unprocessable Entity`: Field constraints failed
pub async fn update_task(
    State(state): State<AppState>,
    query: Result<Query<TaskIdQuery>, QueryRejection>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<TransactionResponse>> {
    let Query(TaskIdQuery { task_id }) = query?;
    let Json(req) = payload?;
    req.validate()?;

    let mut tx = state.db.begin().await?;

    if Task::find_by_id(&mut *tx, task_id).await?.is_none() {
        return Err(ApiError::task_not_found());
    }

    if !User::exists(&mut *tx, req.user_id).await? {
        return Err(ApiError::user_not_found());
    }

    let task = Task::update(&mut *tx, task_id, req.into())
        .await?
        .ok_or_else(ApiError::task_not_found)?;

    tx.commit().await?;

    tracing::info!(task_id = task.id, slug = %task.slug, "Task updated");

    Ok(Json(TransactionResponse::ok("Task update is successful!")))
}

/// Soft-delete a task
///
/// ```text
/// DELETE /task/delete?task_id=1
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No active task with this ID
pub async fn delete_task(
    State(state): State<AppState>,
    query: Result<Query<TaskIdQuery>, QueryRejection>,
) -> ApiResult<Json<TransactionResponse>> {
    let Query(TaskIdQuery { task_id }) = query?;

    let mut tx = state.db.begin().await?;

    if !Task::soft_delete(&mut *tx, task_id).await? {
        return Err(ApiError::task_not_found());
    }

    tx.commit().await?;

    tracing::info!(task_id, "Task deactivated");

    Ok(Json(TransactionResponse::ok("Task delete is successful")))
}
