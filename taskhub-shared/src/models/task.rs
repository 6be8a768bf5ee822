/// Task model and database operations
///
/// Every task belongs to one user through `user_id`. Like users, tasks are
/// soft-deleted: `soft_delete` clears `is_active`, list queries skip inactive
/// rows, and `find_by_id` still returns them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     content TEXT NOT NULL DEFAULT '',
///     priority INTEGER NOT NULL DEFAULT 0 CHECK (priority >= 0),
///     slug VARCHAR(255) NOT NULL,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     user_id BIGINT NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::models::task::{CreateTask, Task};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, owner_id: i64) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     title: "Write report".to_string(),
///     content: "Quarterly numbers".to_string(),
///     priority: 2,
///     user_id: owner_id,
/// })
/// .await?;
/// assert_eq!(task.slug, "write-report");
///
/// let open = Task::list_active_by_user(&pool, owner_id).await?;
/// assert!(open.iter().any(|t| t.id == task.id));
/// # Ok(())
/// # }
/// ```

use crate::slug::slugify;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Postgres};
use tracing::debug;

const TASK_COLUMNS: &str =
    "id, title, content, priority, slug, is_active, user_id, created_at, updated_at";

/// A task owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    pub title: String,

    pub content: String,

    /// Ordinal priority; 0 is the lowest
    pub priority: i32,

    /// Derived from `title` on every write
    pub slug: String,

    /// Cleared by `soft_delete`
    pub is_active: bool,

    /// Owning user
    pub user_id: i64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
///
/// The caller is responsible for checking that `user_id` names an existing
/// user; the foreign key rejects the insert otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub content: String,
    pub priority: i32,
    pub user_id: i64,
}

/// Full replacement of a task's editable fields, including its owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: String,
    pub content: String,
    pub priority: i32,
    pub user_id: i64,
}

impl Task {
    /// Inserts a new active task with a slug derived from `title`
    pub async fn create<'e, E>(executor: E, data: CreateTask) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slug = slugify(&data.title);

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (title, content, priority, slug, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(data.title)
        .bind(data.content)
        .bind(data.priority)
        .bind(slug)
        .bind(data.user_id)
        .fetch_one(executor)
        .await?;

        debug!(task_id = task.id, user_id = task.user_id, slug = %task.slug, "Created task");
        Ok(task)
    }

    /// Finds a task by ID, active or not
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Lists active tasks in storage order
    pub async fn list_active<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE is_active ORDER BY id"
        ))
        .fetch_all(executor)
        .await
    }

    /// Lists active tasks owned by `user_id`
    ///
    /// Does not check that the user exists; an unknown ID yields an empty list.
    pub async fn list_active_by_user<'e, E>(
        executor: E,
        user_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 AND is_active ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    /// Overwrites title, content, priority and owner, and re-derives the slug
    ///
    /// # Returns
    ///
    /// The updated task, or None if no row has this ID
    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slug = slugify(&data.title);

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET title = $2,
                content = $3,
                priority = $4,
                user_id = $5,
                slug = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.title)
        .bind(data.content)
        .bind(data.priority)
        .bind(data.user_id)
        .bind(slug)
        .fetch_optional(executor)
        .await?;

        if let Some(ref t) = task {
            debug!(task_id = t.id, slug = %t.slug, "Updated task");
        }

        Ok(task)
    }

    /// Clears the active flag of an active task
    ///
    /// # Returns
    ///
    /// True if an active task was deactivated, false if the task is missing
    /// or already inactive
    pub async fn soft_delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET is_active = FALSE,
                updated_at = NOW()
            WHERE id = $1 AND is_active
            "#,
        )
        .bind(id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
