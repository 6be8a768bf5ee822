/// Database models for taskhub
///
/// # Models
///
/// - `user`: user accounts, owners of tasks
/// - `task`: tasks, each owned by one user
///
/// Both are soft-deleted through an `is_active` flag and carry a slug
/// derived from their display name (see `crate::slug`).
///
/// All operations are generic over `sqlx::Executor`, so they run equally
/// against a `&PgPool` or inside a transaction (`&mut *tx`).

pub mod task;
pub mod user;
