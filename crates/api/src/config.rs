use std::time::Duration;

use g1000_db::PoolSettings;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Pool acquire timeout in seconds (default: `5`).
    pub db_acquire_timeout_secs: u64,
    /// Per-statement timeout in milliseconds (default: `5000`).
    pub db_statement_timeout_ms: u64,
    /// Session token configuration.
    pub jwt: JwtConfig,
    /// Mark the session cookie `Secure` (true when `APP_ENV=production`).
    pub cookie_secure: bool,
    /// Email domains accepted for student sign-in (suffix match).
    pub institution_domains: Vec<String>,
    /// How often expired verification challenges are purged.
    pub challenge_purge_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                  |
    /// |---------------------------------|--------------------------|
    /// | `HOST`                          | `0.0.0.0`                |
    /// | `PORT`                          | `3000`                   |
    /// | `CORS_ORIGINS`                  | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                     |
    /// | `DB_ACQUIRE_TIMEOUT_SECS`       | `5`                      |
    /// | `DB_STATEMENT_TIMEOUT_MS`       | `5000`                   |
    /// | `APP_ENV`                       | `development`            |
    /// | `INSTITUTION_DOMAINS`           | `babson.edu`             |
    /// | `CHALLENGE_PURGE_INTERVAL_SECS` | `900`                    |
    ///
    /// # Panics
    ///
    /// Panics on unparseable numeric values and when [`JwtConfig::from_env`]
    /// panics; misconfiguration should stop the process at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_list(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let db_acquire_timeout_secs: u64 = std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("DB_ACQUIRE_TIMEOUT_SECS must be a valid u64");

        let db_statement_timeout_ms: u64 = std::env::var("DB_STATEMENT_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("DB_STATEMENT_TIMEOUT_MS must be a valid u64");

        let cookie_secure = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let institution_domains: Vec<String> = split_list(
            &std::env::var("INSTITUTION_DOMAINS").unwrap_or_else(|_| "babson.edu".into()),
        )
        .into_iter()
        .map(|d| d.to_ascii_lowercase())
        .collect();

        let challenge_purge_interval_secs: u64 = std::env::var("CHALLENGE_PURGE_INTERVAL_SECS")
            .unwrap_or_else(|_| "900".into())
            .parse()
            .expect("CHALLENGE_PURGE_INTERVAL_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            db_acquire_timeout_secs,
            db_statement_timeout_ms,
            jwt: JwtConfig::from_env(),
            cookie_secure,
            institution_domains,
            challenge_purge_interval_secs,
        }
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            acquire_timeout: Duration::from_secs(self.db_acquire_timeout_secs),
            statement_timeout: Duration::from_millis(self.db_statement_timeout_ms),
            ..PoolSettings::default()
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
