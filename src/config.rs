//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;

/// How the intake is exposed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// HTTP server (`/chat`, `/upload`, `/live_frt`).
    Server,
    /// stdin/stdout REPL for local use.
    Cli,
}

impl std::str::FromStr for RunMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "server" => Ok(Self::Server),
            "cli" => Ok(Self::Cli),
            other => Err(ConfigError::InvalidValue {
                key: "FRT_INTAKE_MODE".to_string(),
                message: format!("expected 'server' or 'cli', got '{other}'"),
            }),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the question catalog JSON document.
    pub catalog_path: PathBuf,
    /// Directory uploaded videos are copied into.
    pub upload_dir: PathBuf,
    /// HTTP port for server mode.
    pub port: u16,
    pub mode: RunMode,
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("./questions.json"),
            upload_dir: PathBuf::from("./uploads"),
            port: 5000,
            mode: RunMode::Server,
            max_upload_bytes: 200 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Build config from environment variables, falling back to defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let catalog_path = lookup("FRT_INTAKE_CATALOG")
            .map(PathBuf::from)
            .unwrap_or(defaults.catalog_path);

        let upload_dir = lookup("FRT_INTAKE_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.upload_dir);

        let port = match lookup("FRT_INTAKE_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "FRT_INTAKE_PORT".to_string(),
                message: format!("'{raw}' is not a valid port"),
            })?,
            None => defaults.port,
        };

        let mode = match lookup("FRT_INTAKE_MODE") {
            Some(raw) => raw.parse()?,
            None => defaults.mode,
        };

        let max_upload_bytes = match lookup("FRT_INTAKE_MAX_UPLOAD_MB") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|mb| *mb > 0)
                .and_then(|mb| mb.checked_mul(1024 * 1024))
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "FRT_INTAKE_MAX_UPLOAD_MB".to_string(),
                    message: format!("'{raw}' is not a positive size in MB"),
                })?,
            None => defaults.max_upload_bytes,
        };

        Ok(Self {
            catalog_path,
            upload_dir,
            port,
            mode,
            max_upload_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("./questions.json"));
        assert_eq!(config.upload_dir, PathBuf::from("./uploads"));
        assert_eq!(config.port, 5000);
        assert_eq!(config.mode, RunMode::Server);
        assert_eq!(config.max_upload_bytes, 200 * 1024 * 1024);
    }

    #[test]
    fn overrides_from_lookup() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("FRT_INTAKE_CATALOG", "/etc/frt/questions.json"),
            ("FRT_INTAKE_UPLOAD_DIR", "/var/frt/uploads"),
            ("FRT_INTAKE_PORT", "8081"),
            ("FRT_INTAKE_MODE", "CLI"),
            ("FRT_INTAKE_MAX_UPLOAD_MB", "50"),
        ]))
        .unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("/etc/frt/questions.json"));
        assert_eq!(config.upload_dir, PathBuf::from("/var/frt/uploads"));
        assert_eq!(config.port, 8081);
        assert_eq!(config.mode, RunMode::Cli);
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("FRT_INTAKE_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "FRT_INTAKE_PORT"));
    }

    #[test]
    fn zero_upload_limit_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("FRT_INTAKE_MAX_UPLOAD_MB", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "FRT_INTAKE_MAX_UPLOAD_MB"));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("FRT_INTAKE_MODE", "desktop")])).unwrap_err();
        assert!(err.to_string().contains("desktop"));
    }
}
