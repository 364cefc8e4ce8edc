//! Best-effort relational storage
//!
//! Storage is a convenience, never a hard dependency: an agent whose
//! credentials are incomplete or whose database is unreachable still
//! constructs and still performs non-storage tasks. The connector is
//! either fully connected or absent; there is no partially-connected
//! state visible to callers.
//!
//! Credential precedence per parameter: environment variable, then the
//! `database` section of the merged configuration, then (for the port
//! only) a fixed default.

use crate::config::Settings;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Default Postgres port, used only when neither source resolves one
pub const DEFAULT_PORT: u16 = 5432;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage credentials incomplete, missing: {0}")]
    IncompleteCredentials(String),
    #[error("connection failed: {0}")]
    Connection(#[from] postgres::Error),
}

/// Connection parameters resolved from environment and configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageParams {
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: u16,
}

impl StorageParams {
    /// Resolve all five parameters from the process environment and the
    /// merged configuration. Loads `.env` best-effort first, the same way
    /// provider keys are sourced.
    pub fn resolve(settings: &Settings) -> Self {
        let _ = dotenvy::dotenv();
        Self::resolve_from(settings, |key| std::env::var(key).ok())
    }

    /// Resolution against an injected environment lookup. Each parameter
    /// falls through independently: env value, then config value.
    pub fn resolve_from(
        settings: &Settings,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let pick = |env_key: &str, config_path: &str| -> Option<String> {
            env(env_key)
                .filter(|v| !v.is_empty())
                .or_else(|| settings.get_string_like(config_path))
                .filter(|v| !v.is_empty())
        };

        let port = match pick("DB_PORT", "database.port") {
            Some(raw) => match raw.parse::<u16>() {
                Ok(port) => port,
                Err(_) => {
                    warn!(value = %raw, "unparseable storage port, using default");
                    DEFAULT_PORT
                }
            },
            None => DEFAULT_PORT,
        };

        Self {
            name: pick("DB_NAME", "database.name"),
            user: pick("DB_USER", "database.user"),
            password: pick("DB_PASSWORD", "database.password"),
            host: pick("DB_HOST", "database.host"),
            port,
        }
    }

    /// Names of required parameters that did not resolve. The port never
    /// appears here since it always has a default.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.user.is_none() {
            missing.push("user");
        }
        if self.password.is_none() {
            missing.push("password");
        }
        if self.host.is_none() {
            missing.push("host");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

/// Zero or one live connection to the relational store
#[derive(Default)]
pub struct StorageConnector {
    client: Option<postgres::Client>,
}

impl StorageConnector {
    /// A connector with no connection, the degraded-mode value
    pub fn absent() -> Self {
        Self { client: None }
    }

    /// Attempt a connection. Incomplete credentials and connection-layer
    /// failures both log and yield an absent connector; this never fails
    /// outward.
    pub fn connect(agent_name: &str, params: &StorageParams) -> Self {
        match Self::try_connect(params) {
            Ok(client) => {
                debug!(
                    agent = %agent_name,
                    host = params.host.as_deref().unwrap_or_default(),
                    port = params.port,
                    "storage connection established"
                );
                Self {
                    client: Some(client),
                }
            }
            Err(StorageError::IncompleteCredentials(missing)) => {
                warn!(
                    agent = %agent_name,
                    missing = %missing,
                    "storage credentials incomplete, continuing without storage"
                );
                Self::absent()
            }
            Err(e) => {
                error!(agent = %agent_name, error = %e, "storage connection failed, continuing without storage");
                Self::absent()
            }
        }
    }

    fn try_connect(params: &StorageParams) -> Result<postgres::Client, StorageError> {
        let missing = params.missing();
        if !missing.is_empty() {
            return Err(StorageError::IncompleteCredentials(missing.join(", ")));
        }

        // missing() guarantees these are present
        let mut config = postgres::Config::new();
        config
            .host(params.host.as_deref().unwrap_or_default())
            .port(params.port)
            .dbname(params.name.as_deref().unwrap_or_default())
            .user(params.user.as_deref().unwrap_or_default())
            .password(params.password.as_deref().unwrap_or_default())
            .connect_timeout(CONNECT_TIMEOUT);

        Ok(config.connect(postgres::NoTls)?)
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Mutable access to the live connection, for personas that persist
    pub fn client_mut(&mut self) -> Option<&mut postgres::Client> {
        self.client.as_mut()
    }

    /// Close the connection if present. Close-time errors are logged and
    /// swallowed; the connector is always absent afterwards. Safe to call
    /// any number of times, including from teardown.
    pub fn release(&mut self) {
        if let Some(client) = self.client.take() {
            if let Err(e) = client.close() {
                warn!(error = %e, "error while closing storage connection");
            }
            debug!("storage connection released");
        }
    }
}

impl Drop for StorageConnector {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn resolves_all_absent_with_port_default() {
        let params = StorageParams::resolve_from(&Settings::empty(), no_env);
        assert_eq!(params.port, DEFAULT_PORT);
        assert_eq!(params.missing(), vec!["name", "user", "password", "host"]);
        assert!(!params.is_complete());
    }

    #[test]
    fn config_values_fill_in() {
        let settings = Settings::from_value(json!({
            "database": {
                "name": "lore",
                "user": "scribe",
                "password": "hunter2",
                "host": "db.example.com",
                "port": 6000
            }
        }));
        let params = StorageParams::resolve_from(&settings, no_env);
        assert!(params.is_complete());
        assert_eq!(params.host.as_deref(), Some("db.example.com"));
        assert_eq!(params.port, 6000);
    }

    #[test]
    fn env_overrides_config_per_parameter() {
        let settings = Settings::from_value(json!({
            "database": {"name": "lore", "user": "scribe", "host": "config-host"}
        }));
        let env: HashMap<&str, &str> =
            [("DB_HOST", "env-host"), ("DB_PASSWORD", "secret")].into();
        let params =
            StorageParams::resolve_from(&settings, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(params.host.as_deref(), Some("env-host"));
        assert_eq!(params.password.as_deref(), Some("secret"));
        // Untouched parameters still come from config
        assert_eq!(params.name.as_deref(), Some("lore"));
        assert_eq!(params.user.as_deref(), Some("scribe"));
    }

    #[test]
    fn empty_env_value_falls_through() {
        let settings = Settings::from_value(json!({"database": {"host": "config-host"}}));
        let params =
            StorageParams::resolve_from(&settings, |key| (key == "DB_HOST").then(String::new));
        assert_eq!(params.host.as_deref(), Some("config-host"));
    }

    #[test]
    fn bad_port_uses_default() {
        let params = StorageParams::resolve_from(&Settings::empty(), |key| {
            (key == "DB_PORT").then(|| "not-a-port".to_string())
        });
        assert_eq!(params.port, DEFAULT_PORT);
    }

    #[test]
    fn incomplete_credentials_never_attempt_connection() {
        let params = StorageParams {
            host: Some("db.example.com".into()),
            ..Default::default()
        };
        let connector = StorageConnector::connect("test", &params);
        assert!(!connector.is_connected());
    }

    #[test]
    fn release_is_idempotent_on_absent_connector() {
        let mut connector = StorageConnector::absent();
        assert!(!connector.is_connected());
        connector.release();
        connector.release();
        assert!(!connector.is_connected());
        assert!(connector.client_mut().is_none());
    }
}
