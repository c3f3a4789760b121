//! Server configuration, loaded from a TOML file.

use serde::{Deserialize, Serialize};

/// Default configuration file path when neither `--config` nor
/// `FRONTDESK_CONFIG` is given.
pub const DEFAULT_CONFIG_PATH: &str = "frontdesk.toml";

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub audit: AuditConfig,
    /// Dashboard accounts. Development fixture: production deployments plug
    /// in an identity provider instead.
    pub users: Vec<DashboardUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter, overridable by `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Audit trail configuration.
///
/// Controls which successful accesses to protected data are recorded. The
/// defaults record every authenticated 2xx response on a protected route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Master switch for the audit middleware.
    pub enabled: bool,

    /// Record GET/HEAD accesses. Disabling keeps only mutations in the trail.
    pub log_read_operations: bool,

    /// Also record non-2xx responses on protected routes, with
    /// `successful = false`. Off by default: failed operations are not part
    /// of the standard trail.
    pub log_failed_requests: bool,

    /// Entity types excluded from auditing entirely.
    pub exclude_entity_types: Vec<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_read_operations: true,
            log_failed_requests: false,
            exclude_entity_types: Vec::new(),
        }
    }
}

/// One dashboard account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardUser {
    pub username: String,
    pub password: String,
    /// Stable principal identifier recorded in the audit trail.
    pub user_id: String,
    #[serde(default)]
    pub clinic_id: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Loads configuration from `path`, or from [`DEFAULT_CONFIG_PATH`] when
/// `path` is `None`.
///
/// An explicitly named file must exist; a missing default file yields the
/// built-in defaults.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let (path, required) = match path {
        Some(p) => (p, true),
        None => (DEFAULT_CONFIG_PATH, false),
    };

    match std::fs::read_to_string(path) {
        Ok(raw) => toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_record_successful_access_only() {
        let audit = AuditConfig::default();
        assert!(audit.enabled);
        assert!(audit.log_read_operations);
        assert!(!audit.log_failed_requests);
        assert!(audit.exclude_entity_types.is_empty());
    }

    #[test]
    fn parses_partial_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            bind_addr = "0.0.0.0:9000"

            [audit]
            log_read_operations = false

            [[users]]
            username = "alice"
            password = "secret"
            user_id = "u1"
            clinic_id = "clinic-1"
            roles = ["staff"]
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.bind_addr, "0.0.0.0:9000");
        assert!(!cfg.audit.log_read_operations);
        // Unset audit flags keep their defaults
        assert!(cfg.audit.enabled);
        assert_eq!(cfg.users.len(), 1);
        assert_eq!(cfg.users[0].clinic_id.as_deref(), Some("clinic-1"));
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn missing_default_file_yields_defaults() {
        let cfg = load_config(None).unwrap();
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config(Some("/nonexistent/frontdesk.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
