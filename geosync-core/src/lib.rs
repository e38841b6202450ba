//! geosync core library: domain types, package reading, configuration, errors.
//!
//! Public API surface:
//! - [`types`]: newtypes and domain structs
//! - [`error`]: [`ConfigError`], [`PackageError`]
//! - [`package`]: read the layer catalog out of a GeoPackage file
//! - [`config`]: resolve sync settings from flags, an ini file and the environment

pub mod config;
pub mod error;
pub mod package;
pub mod types;

pub use config::{ConfigOverrides, SyncConfig};
pub use error::{ConfigError, PackageError};
pub use types::{LayerName, LayerRecord, PackageFile, StoreName};
