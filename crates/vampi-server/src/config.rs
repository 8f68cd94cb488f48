//! Server configuration for `VAmPI`.
//!
//! Wraps the core [`RuntimeConfig`] with the settings only the server
//! binary needs: bind address, storage backend, and log filter. Every
//! setting has a default, so loading never fails.

use std::net::SocketAddr;

use vampi_core::config::RuntimeConfig;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Feature toggles, token lifetime, port, and labels.
    pub runtime: RuntimeConfig,
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Storage backend type.
    pub storage_backend: StorageBackendType,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
}

/// Supported storage backend types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendType {
    /// In-memory (data lost on restart).
    Memory,
    /// PostgreSQL persistent storage.
    Postgres { url: String },
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// On top of the variables read by [`RuntimeConfig::from_env`]:
    /// - `VAMPI_BIND_ADDR` — full bind address (overrides `PORT`, default: `0.0.0.0:<PORT>`)
    /// - `VAMPI_STORAGE` — `memory` or `postgres` (default: `memory`)
    /// - `DATABASE_URL` — PostgreSQL connection string (default: `postgres://localhost/vampi`)
    /// - `VAMPI_LOG_LEVEL` — log filter (default: `info`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn resolve<F>(read: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let runtime = RuntimeConfig::resolve(&read);

        let bind_addr = read("VAMPI_BIND_ADDR")
            .and_then(|addr| addr.trim().parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], runtime.listen_port)));

        let storage_backend = match read("VAMPI_STORAGE")
            .unwrap_or_else(|| "memory".to_owned())
            .to_lowercase()
            .as_str()
        {
            "postgres" | "postgresql" => {
                let url = read("DATABASE_URL")
                    .unwrap_or_else(|| "postgres://localhost/vampi".to_owned());
                StorageBackendType::Postgres { url }
            }
            _ => StorageBackendType::Memory,
        };

        let log_level = read("VAMPI_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        Self {
            runtime,
            bind_addr,
            storage_backend,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn resolve(vars: &[(&str, &str)]) -> ServerConfig {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        ServerConfig::resolve(|key| map.get(key).map(|v| (*v).to_owned()))
    }

    #[test]
    fn defaults_bind_all_interfaces_on_default_port() {
        let config = resolve(&[]);
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 5050)));
        assert_eq!(config.storage_backend, StorageBackendType::Memory);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn port_feeds_bind_addr() {
        let config = resolve(&[("PORT", "8080")]);
        assert_eq!(config.runtime.listen_port, 8080);
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn explicit_bind_addr_wins() {
        let config = resolve(&[("PORT", "8080"), ("VAMPI_BIND_ADDR", "127.0.0.1:9999")]);
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 9999)));
    }

    #[test]
    fn malformed_bind_addr_falls_back_to_port() {
        let config = resolve(&[("VAMPI_BIND_ADDR", "nowhere")]);
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 5050)));
    }

    #[test]
    fn postgres_backend_reads_database_url() {
        let config = resolve(&[
            ("VAMPI_STORAGE", "Postgres"),
            ("DATABASE_URL", "postgres://db/vampi"),
        ]);
        assert_eq!(
            config.storage_backend,
            StorageBackendType::Postgres {
                url: "postgres://db/vampi".to_owned()
            }
        );
    }
}
