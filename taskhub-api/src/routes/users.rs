/// User endpoints
///
/// # Endpoints
///
/// - `GET /user/` - List active users
/// - `GET /user/:id` - Get a user (inactive users included)
/// - `GET /user/:id/tasks` - List a user's active tasks
/// - `POST /user/create` - Create a user
/// - `PUT /user/update?user_id=` - Replace a user's fields
/// - `DELETE /user/delete?user_id=` - Soft-delete a user
///
/// Slugs are derived from `username` by the model layer; requests never
/// carry one.

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
    task::Task,
    user::{CreateUser, UpdateUser, User},
};
use validator::Validate;

/// Create user request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(min = 1, max = 64, message = "Username must be 1-64 characters"),
        custom(function = "validate_sluggable")
    )]
    pub username: String,

    #[validate(
        length(min = 1, max = 100, message = "First name must be 1-100 characters"),
        custom(function = "validate_text")
    )]
    pub firstname: String,

    #[validate(
        length(min = 1, max = 100, message = "Last name must be 1-100 characters"),
        custom(function = "validate_text")
    )]
    pub lastname: String,

    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: i32,
}

/// Update user request
///
/// All fields are replaced; the slug is re-derived from `username`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 1, max = 64, message = "Username must be 1-64 characters"),
        custom(function = "validate_sluggable")
    )]
    pub username: String,

    #[validate(
        length(min = 1, max = 100, message = "First name must be 1-100 characters"),
        custom(function = "validate_text")
    )]
    pub firstname: String,

    #[validate(
        length(min = 1, max = 100, message = "Last name must be 1-100 characters"),
        custom(function = "validate_text")
    )]
    pub lastname: String,

    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: i32,
}

/// `?user_id=` query parameter
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UserIdQuery {
    pub user_id: i64,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(req: CreateUserRequest) -> Self {
        CreateUser {
            username: req.username,
            firstname: req.firstname,
            lastname: req.lastname,
            age: req.age,
        }
    }
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        UpdateUser {
            username: req.username,
            firstname: req.firstname,
            lastname: req.lastname,
            age: req.age,
        }
    }
}

/// List active users
///
/// ```text
/// GET /user/
/// ```
///
/// Returns users whose `is_active` flag is set, in storage order.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = User::list_active(&state.db).await?;
    Ok(Json(users))
}

/// Get a user by ID
///
/// ```text
/// GET /user/:id
/// ```
///
/// Soft-deleted users are still returned, with `is_active: false`.
///
/// # Errors
///
/// - `404 Not Found`: No user with this ID
pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<User>> {
    let Path(user_id) = path?;

    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(ApiError::user_not_found)?;

    Ok(Json(user))
}

/// List a user's active tasks
///
/// ```text
/// GET /user/:id/tasks
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No user with this ID
pub async fn list_user_tasks(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    let Path(user_id) = path?;

    // Both reads share one connection
    let mut conn = state.db.acquire().await?;

    if !User::exists(&mut *conn, user_id).await? {
        return Err(ApiError::user_not_found());
    }

    let tasks = Task::list_active_by_user(&mut *conn, user_id).await?;
    Ok(Json(tasks))
}

/// Create a user
///
/// ```text
/// POST /user/create
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "firstname": "Alice",
///   "lastname": "Liddell",
///   "age": 30
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "status_code": 201, "transaction": "Successful", "id": 1 }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Body is not valid JSON for this shape
/// - `422 Unprocessable Entity`: Field constraints failed
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TransactionResponse>)> {
    let Json(req) = payload?;
    req.validate()?;

    let user = User::create(&state.db, req.into()).await?;

    tracing::info!(user_id = user.id, slug = %user.slug, "User created");

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse::created(user.id)),
    ))
}

/// Replace a user's fields
///
/// ```text
/// PUT /user/update?user_id=1
/// Content-Type: application/json
///
/// { "username": "alice2", "firstname": "Alice", "lastname": "L", "age": 31 }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No user with this ID
/// - `422 Unprocessable Entity`: Field constraints failed
pub async fn update_user(
    State(state): State<AppState>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<Json<TransactionResponse>> {
    let Query(UserIdQuery { user_id }) = query?;
    let Json(req) = payload?;
    req.validate()?;

    let mut tx = state.db.begin().await?;

    let user = User::update(&mut *tx, user_id, req.into())
        .await?
        .ok_or_else(ApiError::user_not_found)?;

    tx.commit().await?;

    tracing::info!(user_id = user.id, slug = %user.slug, "User updated");

    Ok(Json(TransactionResponse::ok("User update is successful!")))
}

/// Soft-delete a user
///
/// ```text
/// DELETE /user/delete?user_id=1
/// ```
///
/// Clears the user's `is_active` flag. The row and the user's tasks are
/// kept. Deleting an already inactive user is a 404.
///
/// # Errors
///
/// - `404 Not Found`: No active user with this ID
pub async fn delete_user(
    State(state): State<AppState>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> ApiResult<Json<TransactionResponse>> {
    let Query(UserIdQuery { user_id }) = query?;

    let mut tx = state.db.begin().await?;

    if !User::soft_delete(&mut *tx, user_id).await? {
        return Err(ApiError::user_not_found());
    }

    tx.commit().await?;

    tracing::info!(user_id, "User deactivated");

    Ok(Json(TransactionResponse::ok("User delete is successful")))
}
