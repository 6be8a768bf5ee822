/// User model and database operations
///
/// Users own zero or more tasks. A user is never removed by these
/// operations: `soft_delete` clears `is_active` and the row stays, so
/// `find_by_id` keeps returning it while `list_active` hides it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     username VARCHAR(64) NOT NULL,
///     firstname VARCHAR(100) NOT NULL,
///     lastname VARCHAR(100) NOT NULL,
///     age INTEGER NOT NULL CHECK (age >= 0),
///     slug VARCHAR(255) NOT NULL,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     username: "alice".to_string(),
///     firstname: "Alice".to_string(),
///     lastname: "Liddell".to_string(),
///     age: 30,
/// })
/// .await?;
/// assert_eq!(user.slug, "alice");
///
/// User::soft_delete(&pool, user.id).await?;
/// assert!(User::list_active(&pool).await?.iter().all(|u| u.id != user.id));
/// # Ok(())
/// # }
/// ```

use crate::slug::slugify;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Postgres};
use tracing::debug;

const USER_COLUMNS: &str =
    "id, username, firstname, lastname, age, slug, is_active, created_at, updated_at";

/// A user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    pub username: String,

    pub firstname: String,

    pub lastname: String,

    pub age: i32,

    /// Derived from `username` on every write
    pub slug: String,

    /// Cleared by `soft_delete`
    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
///
/// There is no slug field: it is always derived from `username`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub age: i32,
}

/// Full replacement of a user's editable fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUser {
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub age: i32,
}

impl User {
    /// Inserts a new active user with a slug derived from `username`
    ///
    /// # Errors
    ///
    /// Returns an error if the database rejects the row or is unreachable.
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slug = slugify(&data.username);

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, firstname, lastname, age, slug)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(data.username)
        .bind(data.firstname)
        .bind(data.lastname)
        .bind(data.age)
        .bind(slug)
        .fetch_one(executor)
        .await?;

        debug!(user_id = user.id, slug = %user.slug, "Created user");
        Ok(user)
    }

    /// Finds a user by ID, active or not
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Returns true if a user row with this ID exists
    ///
    /// Inactive users still count; ownership checks only need the row.
    pub async fn exists<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await
    }

    /// Lists active users in storage order
    pub async fn list_active<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE is_active ORDER BY id"
        ))
        .fetch_all(executor)
        .await
    }

    /// Overwrites username, names and age, and re-derives the slug
    ///
    /// # Returns
    ///
    /// The updated user, or None if no row has this ID
    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slug = slugify(&data.username);

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET username = $2,
                firstname = $3,
                lastname = $4,
                age = $5,
                slug = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.username)
        .bind(data.firstname)
        .bind(data.lastname)
        .bind(data.age)
        .bind(slug)
        .fetch_optional(executor)
        .await?;

        if let Some(ref u) = user {
            debug!(user_id = u.id, slug = %u.slug, "Updated user");
        }

        Ok(user)
    }

    /// Clears the active flag
    ///
    /// Only active rows match, so deleting the same user twice returns
    /// false the second time.
    ///
    /// # Returns
    ///
    /// True if an active user was deactivated
    pub async fn soft_delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE users
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
