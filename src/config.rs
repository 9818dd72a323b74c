use std::env;
use std::net::SocketAddr;

/// AppConfig
///
/// Holds the application's configuration, loaded once at startup and immutable
/// afterwards. Shared with handlers through `AppState`.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `APP_ENV` | `local` | `production` selects JSON logs and requires `DATABASE_URL` |
/// | `DATABASE_URL` | (absent = in-memory in local) | Postgres connection string |
/// | `BIND_ADDR` | `0.0.0.0:9090` | Socket address the server listens on |
/// | `DB_MAX_CONNECTIONS` | `5` | Connection pool size |
/// | `RUN_MIGRATIONS` | `true` | Apply `migrations/` before serving |
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Database connection string (Postgres). `None` selects the in-memory repository.
    pub db_url: Option<String>,
    // Socket address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    // Upper bound on pooled Postgres connections.
    pub max_connections: u32,
    // Whether the bundled sqlx migrations run at startup.
    pub run_migrations: bool,
    // Runtime environment marker. Controls log format and fail-fast checks.
    pub env: Env,
}

/// Env
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9090";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics if `DATABASE_URL` is missing in production, or if `BIND_ADDR` /
    /// `DB_MAX_CONNECTIONS` are set but unparsable. Starting with a half-valid
    /// configuration is never attempted.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let db_url = match env {
            Env::Production => Some(
                env::var("DATABASE_URL").expect("FATAL: DATABASE_URL required in production"),
            ),
            Env::Local => env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
        };

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .expect("FATAL: BIND_ADDR must be a socket address (e.g. 0.0.0.0:9090)");

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .map(|raw| {
                raw.parse()
                    .expect("FATAL: DB_MAX_CONNECTIONS must be a positive integer")
            })
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let run_migrations = env::var("RUN_MIGRATIONS")
            .map(|raw| !matches!(raw.to_ascii_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);

        Self {
            db_url,
            bind_addr,
            max_connections,
            run_migrations,
            env,
        }
    }
}
