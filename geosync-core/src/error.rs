//! Error types for geosync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid or missing configuration. Raised before any package is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The sync directory does not exist or is not a directory.
    #[error("invalid directory supplied: {path}")]
    InvalidDirectory { path: PathBuf },

    /// Both an explicit file list and a search pattern were given.
    #[error("an explicit file list and a search pattern are mutually exclusive")]
    ConflictingInputs,

    /// Neither an explicit file list nor a search pattern was given.
    #[error("no files or search pattern supplied")]
    NoInput,

    /// A required environment variable is unset or empty.
    #[error("missing or empty {name} in environment")]
    MissingEnv { name: &'static str },

    /// A setting could not be parsed.
    #[error("invalid configuration: {key} = '{value}' - {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// The ini config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },
}

/// Errors raised while reading the catalog of a package file.
#[derive(Debug, Error)]
pub enum PackageError {
    /// The file is not a readable SQLite container, or the catalog query failed.
    #[error("error reading GeoPackage {path} (is it the right format?): {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The catalog query succeeded but returned no rows.
    #[error("can't find any layers in GeoPackage {path}")]
    Empty { path: PathBuf },

    /// The file name has no stem to derive a datastore name from.
    #[error("cannot derive a datastore name from {path}")]
    NoIdentifier { path: PathBuf },
}
