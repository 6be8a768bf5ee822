/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use taskhub_api::{app::{build_router, AppState}, config::Config};
/// use taskhub_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.database.clone()).await?;
/// let app = build_router(AppState::new(pool, config));
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler via `State`. Holds no mutable data: the pool
/// hands each request its own connection or transaction.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET    /health
/// ├── /user
/// │   ├── GET    /               # active users
/// │   ├── GET    /:id
/// │   ├── GET    /:id/tasks      # user's active tasks
/// │   ├── POST   /create
/// │   ├── PUT    /update?user_id=
/// │   └── DELETE /delete?user_id=
/// └── /task
///     ├── GET    /               # active tasks
///     ├── GET    /:id
///     ├── POST   /create
///     ├── PUT    /update?task_id=
///     └── DELETE /delete?task_id=
/// ```
///
/// Paths are registered in full rather than nested so that both `/user`
/// and `/user/` reach the list handler.
pub fn build_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/user", get(routes::users::list_users))
        .route("/user/", get(routes::users::list_users))
        .route("/user/create", post(routes::users::create_user))
        .route("/user/update", put(routes::users::update_user))
        .route("/user/delete", delete(routes::users::delete_user))
        .route("/user/:id", get(routes::users::get_user))
        .route("/user/:id/tasks", get(routes::users::list_user_tasks));

    let task_routes = Router::new()
        .route("/task", get(routes::tasks::list_tasks))
        .route("/task/", get(routes::tasks::list_tasks))
        .route("/task/create", post(routes::tasks::create_task))
        .route("/task/update", put(routes::tasks::update_task))
        .route("/task/delete", delete(routes::tasks::delete_task))
        .route("/task/:id", get(routes::tasks::get_task));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(user_routes)
        .merge(task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origins))
        .with_state(state)
}

/// `*` anywhere in `origins` allows any origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}
