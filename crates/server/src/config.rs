// Server configuration.
//
// Centralizes environment variable parsing with defaults for local
// development. The database pool reads its own tuning vars — this module
// covers the core server settings.

use std::net::SocketAddr;

/// Core server configuration.
///
/// Constructed via [`ServerConfig::from_env`] which reads environment
/// variables and falls back to sensible development defaults.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address (host:port).
    pub listen_addr: SocketAddr,
    /// PostgreSQL connection string. Required to serve.
    pub database_url: Option<String>,
    /// Base URL of the content-filter service.
    pub filter_url: String,
    /// Log filter directive (e.g. `info`, `quire_server=debug`).
    pub log_filter: String,
}

impl ServerConfig {
    /// Parse configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `QUIRE_SERVER_HOST` | `0.0.0.0` |
    /// | `QUIRE_SERVER_PORT` | `8080` |
    /// | `QUIRE_SERVER_DATABASE_URL` | *(none — required to serve)* |
    /// | `QUIRE_SERVER_FILTER_URL` | `http://localhost:8081` |
    /// | `QUIRE_SERVER_LOG_FILTER` | `info` |
    pub fn from_env() -> Self {
        Self::from_env_fn(|key| std::env::var(key))
    }

    /// Testable constructor that accepts an environment lookup function.
    fn from_env_fn<F>(env: F) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let host = env("QUIRE_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env("QUIRE_SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);
        let listen_addr = format!("{host}:{port}")
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], port)));

        let database_url = env("QUIRE_SERVER_DATABASE_URL").ok();

        let filter_url = env("QUIRE_SERVER_FILTER_URL")
            .unwrap_or_else(|_| "http://localhost:8081".into());

        let log_filter = env("QUIRE_SERVER_LOG_FILTER").unwrap_or_else(|_| "info".into());

        Self { listen_addr, database_url, filter_url, log_filter }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from_map(
        map: HashMap<&'static str, &'static str>,
    ) -> impl Fn(&str) -> Result<String, std::env::VarError> {
        move |key: &str| {
            map.get(key)
                .map(|v| v.to_string())
                .ok_or(std::env::VarError::NotPresent)
        }
    }

    #[test]
    fn defaults_when_no_env_vars() {
        let cfg = ServerConfig::from_env_fn(env_from_map(HashMap::new()));
        assert_eq!(cfg.listen_addr.port(), 8080);
        assert_eq!(cfg.listen_addr.ip().to_string(), "0.0.0.0");
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.filter_url, "http://localhost:8081");
        assert_eq!(cfg.log_filter, "info");
    }

    #[test]
    fn custom_host_and_port() {
        let mut m = HashMap::new();
        m.insert("QUIRE_SERVER_HOST", "127.0.0.1");
        m.insert("QUIRE_SERVER_PORT", "3000");
        let cfg = ServerConfig::from_env_fn(env_from_map(m));
        assert_eq!(cfg.listen_addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn database_url_from_env() {
        let mut m = HashMap::new();
        m.insert("QUIRE_SERVER_DATABASE_URL", "postgres://u:p@host/quire");
        let cfg = ServerConfig::from_env_fn(env_from_map(m));
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://u:p@host/quire"));
    }

    #[test]
    fn filter_url_override() {
        let mut m = HashMap::new();
        m.insert("QUIRE_SERVER_FILTER_URL", "http://filter.internal:9000");
        let cfg = ServerConfig::from_env_fn(env_from_map(m));
        assert_eq!(cfg.filter_url, "http://filter.internal:9000");
    }

    #[test]
    fn log_filter_override() {
        let mut m = HashMap::new();
        m.insert("QUIRE_SERVER_LOG_FILTER", "debug,tower_http=trace");
        let cfg = ServerConfig::from_env_fn(env_from_map(m));
        assert_eq!(cfg.log_filter, "debug,tower_http=trace");
    }

    #[test]
    fn invalid_port_uses_default() {
        let mut m = HashMap::new();
        m.insert("QUIRE_SERVER_PORT", "not_a_number");
        let cfg = ServerConfig::from_env_fn(env_from_map(m));
        assert_eq!(cfg.listen_addr.port(), 8080);
    }
}
