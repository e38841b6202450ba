//! Sync settings.
//!
//! Values are resolved per key in this order: explicit command-line flag,
//! then the `[sync]` section of an optional ini file, then built-in defaults.
//! The map server password never comes from a flag; it is read from the ini
//! `pass` key or the `GEOSERVER_PASSWORD` environment variable.

use std::path::{Path, PathBuf};

use ini::{Ini, Properties};

use crate::error::ConfigError;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_USER: &str = "admin";
pub const DEFAULT_WORKSPACE: &str = "TEST";
pub const DEFAULT_ROOT: &str = "geoserver";

/// Environment variable holding the map server password.
pub const PASSWORD_ENV: &str = "GEOSERVER_PASSWORD";

/// Section of the ini file that holds sync settings.
pub const CONFIG_SECTION: &str = "sync";

/// Values given explicitly on the command line. `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub workspace: Option<String>,
    pub dir: Option<PathBuf>,
    pub pattern: Option<String>,
}

/// Fully resolved settings for one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub workspace: String,
    /// Context path the map server is mounted under.
    pub root: String,
    /// Directory the search pattern is applied under.
    pub dir: PathBuf,
    pub pattern: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            password: String::new(),
            workspace: DEFAULT_WORKSPACE.to_string(),
            root: DEFAULT_ROOT.to_string(),
            dir: PathBuf::from("."),
            pattern: None,
        }
    }
}

impl SyncConfig {
    /// Resolve settings from flags, an optional ini file and `env`.
    ///
    /// `env` is a lookup function so callers can pass `std::env::var(..).ok()`
    /// or a fixed map in tests.
    pub fn resolve(
        overrides: ConfigOverrides,
        config_file: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let ini = match config_file {
            Some(path) => Some(Ini::load_from_file(path).map_err(|source| {
                ConfigError::ConfigFile {
                    path: path.to_path_buf(),
                    source,
                }
            })?),
            None => None,
        };
        let section = ini.as_ref().and_then(|ini| ini.section(Some(CONFIG_SECTION)));
        let file = |key: &str| file_value(section, key);

        let defaults = Self::default();
        let port = match (overrides.port, file("port")) {
            (Some(port), _) => port,
            (None, Some(raw)) => parse_port(&raw)?,
            (None, None) => defaults.port,
        };
        let password = file("pass")
            .or_else(|| env(PASSWORD_ENV))
            .unwrap_or_default();
        let pattern = overrides
            .pattern
            .or_else(|| file("pattern"))
            .filter(|p| !p.is_empty());

        Ok(Self {
            host: overrides.host.or_else(|| file("host")).unwrap_or(defaults.host),
            port,
            user: overrides.user.or_else(|| file("user")).unwrap_or(defaults.user),
            password,
            workspace: overrides
                .workspace
                .or_else(|| file("workspace"))
                .unwrap_or(defaults.workspace),
            root: file("root").unwrap_or(defaults.root),
            dir: overrides
                .dir
                .or_else(|| file("dir").map(PathBuf::from))
                .unwrap_or(defaults.dir),
            pattern,
        })
    }

    /// `http://{host}:{port}/{root}/rest/workspaces/{workspace}`
    pub fn workspace_url(&self) -> String {
        format!(
            "http://{}:{}/{}/rest/workspaces/{}",
            self.host,
            self.port,
            self.root.trim_matches('/'),
            self.workspace
        )
    }
}

/// Keys are matched case-insensitively, so `Host = ...` reads as `host`.
fn file_value(section: Option<&Properties>, key: &str) -> Option<String> {
    section?
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.to_owned())
}

/// Parse a TCP port from a config string.
pub fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim()
        .parse::<u16>()
        .map_err(|e| ConfigError::InvalidValue {
            key: "port".to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}
