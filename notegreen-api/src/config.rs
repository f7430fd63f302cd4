/// Configuration management for the API server
///
/// Configuration comes from environment variables, with a `.env` file loaded
/// first when present.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: SQLite connection string (default: sqlite://notegreen.db)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma separated allowed origins, `*` for any (default: *)
/// - `STATIC_DIR`: Directory holding the built web client (default: unset)
/// - `PRODUCTION`: Enables HSTS (default: false)
/// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
/// - `RUST_LOG`: Log filter (default: notegreen_api=debug,tower_http=debug)
///
/// # Example
///
/// ```no_run
/// use notegreen_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use notegreen_shared::db::pool;
use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

/// Default database location, relative to the working directory
pub const DEFAULT_DATABASE_URL: &str = "sqlite://notegreen.db";

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Log output format
    pub log_format: LogFormat,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any origin
    pub cors_origins: Vec<String>,

    /// Production mode (adds HSTS)
    pub production: bool,

    /// Built web client to serve next to the API
    pub static_dir: Option<PathBuf>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines
    Pretty,

    /// One JSON object per line
    Json,
}

impl DatabaseConfig {
    /// Pool settings for the shared database layer
    pub fn pool_config(&self) -> pool::DatabaseConfig {
        pool::DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            ..Default::default()
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that doesn't parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("API_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("API_PORT must be a port number, got {raw:?}"))?,
            None => 8080,
        };

        let cors_origins = var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["*".to_string()]);

        let production = match var("PRODUCTION") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("PRODUCTION must be true or false, got {raw:?}"))?,
            None => false,
        };

        let static_dir = var("STATIC_DIR").map(PathBuf::from);

        let url = var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse::<u32>().with_context(|| {
                format!("DATABASE_MAX_CONNECTIONS must be a positive integer, got {raw:?}")
            })?,
            None => 5,
        };

        if max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }

        let log_format = match var("LOG_FORMAT").as_deref().map(str::trim) {
            None => LogFormat::Pretty,
            Some(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(raw) if raw.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            Some(raw) => anyhow::bail!("LOG_FORMAT must be pretty or json, got {raw:?}"),
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
                production,
                static_dir,
            },
            database: DatabaseConfig {
                url,
                max_connections,
            },
            log_format,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// True when any origin may call the API
    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
