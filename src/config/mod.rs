use std::env;
use std::fmt;

use chrono::{Datelike, Utc};

/// Top-level configuration for the clearance store.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub reference_year: i32,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database = DatabaseConfig::from_env()?;

        let reference_year = match env::var("CLEARANCE_REFERENCE_YEAR") {
            Ok(value) => value
                .trim()
                .parse::<i32>()
                .map_err(|_| ConfigError::InvalidReferenceYear)?,
            Err(_) => Utc::now().year(),
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            database,
            reference_year,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Connection settings for the relational datastore backing the portal.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub port: u16,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
        let user = env::var("DB_USER").unwrap_or_else(|_| "root".to_string());
        let password = env::var("DB_PASSWORD").unwrap_or_default();
        let database =
            env::var("DB_NAME").unwrap_or_else(|_| "masvingo_clearance".to_string());
        let port = env::var("DB_PORT")
            .unwrap_or_else(|_| "3306".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        Ok(Self {
            host,
            user,
            password,
            database,
            port,
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidReferenceYear,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "DB_PORT must be a valid u16"),
            ConfigError::InvalidReferenceYear => {
                write!(f, "CLEARANCE_REFERENCE_YEAR must be a valid year")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("DB_HOST");
        env::remove_var("DB_USER");
        env::remove_var("DB_PASSWORD");
        env::remove_var("DB_NAME");
        env::remove_var("DB_PORT");
        env::remove_var("CLEARANCE_REFERENCE_YEAR");
        env::remove_var("APP_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.user, "root");
        assert_eq!(config.database.password, "");
        assert_eq!(config.database.database, "masvingo_clearance");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.reference_year, Utc::now().year());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn load_honors_environment_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DB_HOST", "db.internal");
        env::set_var("DB_PORT", "3307");
        env::set_var("DB_NAME", "clearance_test");
        env::set_var("CLEARANCE_REFERENCE_YEAR", "2025");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 3307);
        assert_eq!(config.database.database, "clearance_test");
        assert_eq!(config.reference_year, 2025);
        reset_env();
    }

    #[test]
    fn rejects_unparseable_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DB_PORT", "not-a-port");
        match AppConfig::load() {
            Err(ConfigError::InvalidPort) => {}
            other => panic!("expected invalid port error, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_unparseable_reference_year() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CLEARANCE_REFERENCE_YEAR", "soon");
        match AppConfig::load() {
            Err(ConfigError::InvalidReferenceYear) => {}
            other => panic!("expected invalid year error, got {other:?}"),
        }
        reset_env();
    }
}
