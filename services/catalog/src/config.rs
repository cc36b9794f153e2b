use serde::Deserialize;

use shelf_core::config::Config;
use shelf_core::tracing::LogFormat;

/// Catalog service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 8080). Env var: `CATALOG_PORT`.
    #[serde(default = "default_port")]
    pub catalog_port: u16,
    /// Apply pending migrations before serving. Env var: `RUN_MIGRATIONS`.
    #[serde(default)]
    pub run_migrations: bool,
    /// `json` (default) or `pretty`. Env var: `LOG_FORMAT`.
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_port() -> u16 {
    8080
}

impl Config for CatalogConfig {}
