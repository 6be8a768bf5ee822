/// Configuration management for the API server
///
/// Settings come from environment variables (a `.env` file is loaded first
/// if present) layered over built-in defaults with the `config` crate.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `DATABASE_MIN_CONNECTIONS`: warm connections (default: 2)
/// - `DATABASE_ACQUIRE_TIMEOUT_SECONDS`: wait for a connection (default: 30)
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `API_PORT`: port to bind to (default: 8000)
/// - `API_CORS_ORIGINS`: comma-separated origins, `*` for any (default: *)
/// - `API_RUN_MIGRATIONS`: apply migrations at startup (default: true)
/// - `RUST_LOG`: log filter (default: taskhub_api=debug,tower_http=debug)
/// - `LOG_FORMAT`: `json` for JSON log lines (default: text)
///
/// # Example
///
/// ```no_run
/// use taskhub_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use taskhub_shared::db::pool::DatabaseConfig;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database pool configuration
    pub database: DatabaseConfig,
}

/// API server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Apply pending migrations before serving
    pub run_migrations: bool,
}

/// Flat view of the environment, keyed by lowercased variable name
#[derive(Debug, Deserialize)]
struct EnvSettings {
    database_url: Option<String>,
    database_max_connections: u32,
    database_min_connections: u32,
    database_acquire_timeout_seconds: u64,
    api_host: String,
    api_port: u16,
    api_cors_origins: String,
    api_run_migrations: bool,
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a variable has an
    /// invalid value.
    pub fn from_env() -> anyhow::Result<Self> {
        // Development convenience; absence is fine
        dotenvy::dotenv().ok();

        Self::load(config::Environment::default().try_parsing(true))
    }

    /// Loads configuration from an explicit set of variables instead of the
    /// process environment
    pub fn from_vars(vars: HashMap<String, String>) -> anyhow::Result<Self> {
        Self::load(
            config::Environment::default()
                .source(Some(vars))
                .try_parsing(true),
        )
    }

    fn load(env: config::Environment) -> anyhow::Result<Self> {
        let settings: EnvSettings = config::Config::builder()
            .set_default("database_max_connections", 10_i64)?
            .set_default("database_min_connections", 2_i64)?
            .set_default("database_acquire_timeout_seconds", 30_i64)?
            .set_default("api_host", "0.0.0.0")?
            .set_default("api_port", 8000_i64)?
            .set_default("api_cors_origins", "*")?
            .set_default("api_run_migrations", true)?
            .add_source(env)
            .build()
            .context("unable to read configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        let url = settings
            .database_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        if settings.database_min_connections > settings.database_max_connections {
            anyhow::bail!("DATABASE_MIN_CONNECTIONS must not exceed DATABASE_MAX_CONNECTIONS");
        }

        let cors_origins = settings
            .api_cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            api: ApiConfig {
                host: settings.api_host,
                port: settings.api_port,
                cors_origins,
                run_migrations: settings.api_run_migrations,
            },
            database: DatabaseConfig {
                url,
                max_connections: settings.database_max_connections,
                min_connections: settings.database_min_connections,
                acquire_timeout_seconds: settings.database_acquire_timeout_seconds,
                ..Default::default()
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vars(&[(
            "DATABASE_URL",
            "postgresql://localhost/taskhub",
        )]))
        .unwrap();

        assert_eq!(config.database.url, "postgresql://localhost/taskhub");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.min_connections, 2);
        assert_eq!(config.database.acquire_timeout_seconds, 30);
        assert_eq!(config.api.port, 8000);
        assert_eq!(config.api.cors_origins, vec!["*".to_string()]);
        assert!(config.api.run_migrations);
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgresql://db/taskhub"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("DATABASE_MIN_CONNECTIONS", "1"),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "9090"),
            ("API_CORS_ORIGINS", "https://a.example, https://b.example"),
            ("API_RUN_MIGRATIONS", "false"),
        ]))
        .unwrap();

        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.database.min_connections, 1);
        assert_eq!(config.bind_address(), "127.0.0.1:9090");
        assert_eq!(
            config.api.cors_origins,
            vec![
                "https://a.example".to_string(),
                "https://b.example".to_string(),
            ]
        );
        assert!(!config.api.run_migrations);
    }

    #[test]
    fn test_missing_database_url() {
        let err = Config::from_vars(vars(&[("API_PORT", "8000")])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgresql://localhost/taskhub"),
            ("API_PORT", "not-a-port"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_min_connections_above_max() {
        let result = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgresql://localhost/taskhub"),
            ("DATABASE_MAX_CONNECTIONS", "2"),
            ("DATABASE_MIN_CONNECTIONS", "5"),
        ]));
        assert!(result.is_err());
    }
}
