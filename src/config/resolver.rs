//! Layered configuration resolution
//!
//! Two documents per agent, merged in order:
//! - Base: `<project_root>/config/config.yaml` (or an explicit path)
//! - Override: `<project_root>/config/agents/<agent_name_lowercased>_config.json`
//!
//! Override keys replace base keys at the top level (shallow merge: the
//! override's value for a key wins wholesale, nested content included).
//! Resolution never fails: missing files, malformed documents, and unsafe
//! agent names all degrade to a smaller configuration and are logged.

use super::Settings;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Internal failure modes during document loading. These never escape
/// [`ConfigResolver::resolve`]; they exist so load paths can use `?` and
/// the boundary can log one structured error per document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to parse JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("document root in {path} is not a mapping")]
    NotAMapping { path: PathBuf },
}

/// Canonical base document filename inside a configuration directory
const BASE_FILENAME: &str = "config.yaml";

/// Resolves the merged configuration for named agents
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
}

impl ConfigResolver {
    /// Create a resolver rooted at a project directory. `config_path` may
    /// point at a base document directly or at a directory containing
    /// `config.yaml`; when omitted the conventional
    /// `<project_root>/config/config.yaml` is used.
    pub fn new(project_root: impl Into<PathBuf>, config_path: Option<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            config_path,
        }
    }

    /// Produce the merged configuration for one agent. Infallible: every
    /// failure is logged and shrinks the result, down to empty settings.
    pub fn resolve(&self, agent_name: &str) -> Settings {
        let mut merged = match self.load_base() {
            Ok(Some(base)) => base,
            Ok(None) => serde_json::Map::new(),
            Err(e) => {
                error!(agent = %agent_name, error = %e, "failed to load base configuration");
                serde_json::Map::new()
            }
        };

        match self.load_override(agent_name) {
            Ok(Some(overrides)) => {
                for (key, value) in overrides {
                    merged.insert(key, value);
                }
            }
            Ok(None) => {}
            Err(e) => {
                error!(agent = %agent_name, error = %e, "failed to load agent override configuration");
            }
        }

        Settings::from_map(merged)
    }

    fn base_path(&self) -> PathBuf {
        match &self.config_path {
            Some(path) if path.is_dir() => path.join(BASE_FILENAME),
            Some(path) => path.clone(),
            None => self.project_root.join("config").join(BASE_FILENAME),
        }
    }

    fn load_base(&self) -> Result<Option<serde_json::Map<String, Value>>, ConfigError> {
        let path = self.base_path();
        if !path.exists() {
            warn!(path = %path.display(), "base configuration not found, continuing without it");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        // Normalize YAML into JSON values so base and override merge uniformly
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.clone(),
                source,
            })?;
        let json: Value = serde_json::to_value(yaml).map_err(|source| ConfigError::Json {
            path: path.clone(),
            source,
        })?;

        match json {
            Value::Object(map) => {
                debug!(path = %path.display(), keys = map.len(), "loaded base configuration");
                Ok(Some(map))
            }
            Value::Null => Ok(None),
            _ => Err(ConfigError::NotAMapping { path }),
        }
    }

    fn load_override(
        &self,
        agent_name: &str,
    ) -> Result<Option<serde_json::Map<String, Value>>, ConfigError> {
        let Some(stem) = override_stem(agent_name) else {
            debug!(agent = %agent_name, "agent name unsafe for filenames, skipping override");
            return Ok(None);
        };

        let path = self
            .project_root
            .join("config")
            .join("agents")
            .join(format!("{stem}_config.json"));
        if !path.exists() {
            debug!(agent = %agent_name, path = %path.display(), "no override configuration");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let json: Value =
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.clone(),
                source,
            })?;

        match json {
            Value::Object(map) => {
                debug!(agent = %agent_name, path = %path.display(), keys = map.len(), "loaded override configuration");
                Ok(Some(map))
            }
            _ => Err(ConfigError::NotAMapping { path }),
        }
    }
}

/// Lowercased agent name, accepted only when it is safe to embed in a
/// filename. Anything outside `[a-z0-9_-]` means "no override applied".
fn override_stem(agent_name: &str) -> Option<String> {
    let stem = agent_name.to_lowercase();
    if stem.is_empty() {
        return None;
    }
    if stem
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        Some(stem)
    } else {
        None
    }
}
