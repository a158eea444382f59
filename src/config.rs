//! Runtime configuration from environment variables (a `.env` file is loaded by the binaries).

use crate::error::AppError;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/nc_games";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9090";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Seeded in-process store; state is lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(AppError::Config(format!(
                "invalid STORE_BACKEND: {} (expected postgres or memory)",
                s
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub database_url: String,
    pub store_backend: StoreBackend,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub body_limit_bytes: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset or empty variables take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let store_backend = get("STORE_BACKEND")
            .map(|v| v.parse::<StoreBackend>())
            .transpose()?
            .unwrap_or(StoreBackend::Postgres);
        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("invalid BIND_ADDR: {}", e)))?;
        let max_connections = parse_number(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(AppError::Config("DB_MAX_CONNECTIONS must be at least 1".into()));
        }
        let body_limit_bytes = parse_number(
            get("BODY_LIMIT_BYTES"),
            "BODY_LIMIT_BYTES",
            crate::routes::DEFAULT_BODY_LIMIT,
        )?;

        Ok(ServerConfig {
            database_url,
            store_backend,
            bind_addr,
            max_connections,
            body_limit_bytes,
        })
    }
}

fn parse_number<T>(value: Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|e| AppError::Config(format!("invalid {}: {} ({})", key, v, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<ServerConfig, AppError> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ServerConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let c = config(&[]).unwrap();
        assert_eq!(c.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(c.store_backend, StoreBackend::Postgres);
        assert_eq!(c.bind_addr.port(), 9090);
        assert_eq!(c.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(c.body_limit_bytes, crate::routes::DEFAULT_BODY_LIMIT);
    }

    #[test]
    fn reads_overrides() {
        let c = config(&[
            ("DATABASE_URL", "postgres://db/reviews"),
            ("STORE_BACKEND", "Memory"),
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("BODY_LIMIT_BYTES", "1024"),
        ])
        .unwrap();
        assert_eq!(c.database_url, "postgres://db/reviews");
        assert_eq!(c.store_backend, StoreBackend::Memory);
        assert_eq!(c.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(c.max_connections, 12);
        assert_eq!(c.body_limit_bytes, 1024);
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let c = config(&[("BIND_ADDR", "  "), ("STORE_BACKEND", "")]).unwrap();
        assert_eq!(c.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(c.store_backend, StoreBackend::Postgres);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(config(&[("STORE_BACKEND", "sqlite")]), Err(AppError::Config(_))));
        assert!(matches!(config(&[("BIND_ADDR", "nowhere")]), Err(AppError::Config(_))));
        assert!(matches!(config(&[("DB_MAX_CONNECTIONS", "lots")]), Err(AppError::Config(_))));
        assert!(matches!(config(&[("DB_MAX_CONNECTIONS", "0")]), Err(AppError::Config(_))));
    }
}
