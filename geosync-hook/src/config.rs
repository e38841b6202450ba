//! Webhook settings, read from the process environment.

use std::path::{Path, PathBuf};

use geosync_core::config::{parse_port, PASSWORD_ENV};
use geosync_core::{ConfigError, SyncConfig};

pub const SECRET_ENV: &str = "SECRET";
pub const SYNC_DIR_ENV: &str = "SYNC_DIR";
pub const USERNAME_ENV: &str = "GEOSERVER_USERNAME";
pub const WORKSPACE_ENV: &str = "GEOSERVER_WORKSPACE";
pub const HOST_ENV: &str = "GEOSERVER_HOST";
pub const PORT_ENV: &str = "GEOSERVER_PORT";
pub const PATTERN_ENV: &str = "SYNC_PATTERN";
/// CGI name of the `X-Hub-Signature-256` request header.
pub const SIGNATURE_ENV: &str = "HTTP_X_HUB_SIGNATURE_256";

pub const DEFAULT_PATTERN: &str = "*.gpkg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookConfig {
    /// Shared HMAC secret. An unset secret is treated as empty.
    pub secret: String,
    /// Map server settings. `sync.dir` is the checkout that is refreshed and
    /// then synced.
    pub sync: SyncConfig,
}

impl HookConfig {
    /// Read settings through `env`; pass `|k| std::env::var(k).ok()` in production.
    ///
    /// Fails before the request body is touched if the sync directory is
    /// missing or the workspace is not named.
    pub fn from_env(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| env(key).filter(|v| !v.is_empty());

        let sync_dir = non_empty(SYNC_DIR_ENV)
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingEnv { name: SYNC_DIR_ENV })?;
        if !sync_dir.is_dir() {
            return Err(ConfigError::InvalidDirectory { path: sync_dir });
        }
        let workspace = non_empty(WORKSPACE_ENV).ok_or(ConfigError::MissingEnv {
            name: WORKSPACE_ENV,
        })?;
        let pattern = non_empty(PATTERN_ENV).unwrap_or_else(|| DEFAULT_PATTERN.to_string());

        let defaults = SyncConfig::default();
        let port = match non_empty(PORT_ENV) {
            Some(raw) => parse_port(&raw)?,
            None => defaults.port,
        };
        let sync = SyncConfig {
            host: non_empty(HOST_ENV).unwrap_or(defaults.host),
            port,
            user: non_empty(USERNAME_ENV).unwrap_or(defaults.user),
            password: env(PASSWORD_ENV).unwrap_or_default(),
            workspace,
            root: defaults.root,
            dir: sync_dir,
            pattern: Some(pattern),
        };

        Ok(Self {
            secret: env(SECRET_ENV).unwrap_or_default(),
            sync,
        })
    }

    pub fn sync_dir(&self) -> &Path {
        &self.sync.dir
    }

    pub fn pattern(&self) -> &str {
        self.sync.pattern.as_deref().unwrap_or(DEFAULT_PATTERN)
    }
}
